//! Curated advisory content shown alongside each role page.
//!
//! The entries are editorial, not computed: fixed text maintained with the
//! dashboard and returned in a stable order. Each role carries its own
//! metadata shape, so the advisory type is a tagged enum rather than one
//! struct with many optional fields.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Executive,
    CustomerService,
    NetworkOps,
    BillingFinance,
    RevenueOptimization,
    DataAnalyst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum Advisory {
    Executive {
        icon: &'static str,
        text: &'static str,
        confidence: &'static str,
        impact: &'static str,
    },
    CustomerService {
        icon: &'static str,
        text: &'static str,
        confidence: &'static str,
        action: &'static str,
        impact: &'static str,
    },
    NetworkOps {
        icon: &'static str,
        text: &'static str,
        confidence: &'static str,
        severity: &'static str,
        action: &'static str,
        impact: &'static str,
    },
    BillingFinance {
        icon: &'static str,
        text: &'static str,
        confidence: &'static str,
        savings: &'static str,
        action: &'static str,
    },
    RevenueOptimization {
        icon: &'static str,
        text: &'static str,
        confidence: &'static str,
        value: &'static str,
        action: &'static str,
    },
    DataAnalyst {
        icon: &'static str,
        text: &'static str,
        confidence: &'static str,
        kind: &'static str,
        finding: &'static str,
    },
}

/// Advisories for a role, in display order.
pub fn advisories_for(role: Role) -> Vec<Advisory> {
    match role {
        Role::Executive => executive(),
        Role::CustomerService => customer_service(),
        Role::NetworkOps => network_ops(),
        Role::BillingFinance => billing_finance(),
        Role::RevenueOptimization => revenue_optimization(),
        Role::DataAnalyst => data_analyst(),
    }
}

fn executive() -> Vec<Advisory> {
    use Advisory::Executive as A;
    vec![
        A {
            icon: "🔮",
            text: "Predicted 15% increase in complaints next week based on trending patterns",
            confidence: "85%",
            impact: "High",
        },
        A {
            icon: "⚠️",
            text: "Network incident INC-2847 likely to generate 200+ additional complaints",
            confidence: "78%",
            impact: "Critical",
        },
        A {
            icon: "📉",
            text: "Social media sentiment declining 23% - recommend proactive customer outreach",
            confidence: "92%",
            impact: "High",
        },
        A {
            icon: "🎯",
            text: "3 high-value customers at risk of churn based on complaint patterns",
            confidence: "88%",
            impact: "Critical",
        },
    ]
}

fn customer_service() -> Vec<Advisory> {
    use Advisory::CustomerService as A;
    vec![
        A {
            icon: "🤖",
            text: "Smart Routing: Assign billing complaints to Team B for 40% faster resolution (ML confidence: 91%)",
            confidence: "91%",
            action: "Implement Now",
            impact: "Save 156 hrs/month",
        },
        A {
            icon: "📚",
            text: "Agent Training Alert: 5 agents need network troubleshooting skills (handle time 2.3x average)",
            confidence: "87%",
            action: "Schedule Training",
            impact: "Reduce 18% handle time",
        },
        A {
            icon: "👥",
            text: "Staffing Optimization: Add 3 agents at 14:00-16:00 (peak = 3.2x avg), remove 2 at 09:00-11:00",
            confidence: "93%",
            action: "Adjust Schedule",
            impact: "Reduce wait time 45%",
        },
        A {
            icon: "⚠️",
            text: "Escalation Prevention: 12 cases predicted to escalate in next 48hrs - assign to senior agents",
            confidence: "88%",
            action: "Reassign Cases",
            impact: "Prevent €24K churn",
        },
        A {
            icon: "🎯",
            text: "Quality Improvement: Email response templates need update - 28% require follow-up clarification",
            confidence: "82%",
            action: "Update Templates",
            impact: "Reduce 25% volume",
        },
        A {
            icon: "📞",
            text: "Proactive Outreach: 23 customers with declining CSAT - recommend callback within 24 hours",
            confidence: "90%",
            action: "Contact List Ready",
            impact: "Save 18 customers",
        },
        A {
            icon: "🔄",
            text: "Channel Migration: Voice calls declining 12%, Chat growing 28% - reallocate resources accordingly",
            confidence: "85%",
            action: "Resource Planning",
            impact: "Optimize capacity",
        },
        A {
            icon: "⏱️",
            text: "SLA Risk: 47 cases approaching SLA breach (>85% of time elapsed) - prioritize immediately",
            confidence: "96%",
            action: "Priority Queue",
            impact: "Avoid penalties",
        },
    ]
}

fn network_ops() -> Vec<Advisory> {
    use Advisory::NetworkOps as A;
    vec![
        A {
            icon: "📡",
            text: "Predictive Maintenance: Tower SITE-1247 anomaly detected - 87% probability of failure within 72hrs",
            confidence: "87%",
            severity: "Critical",
            action: "Schedule inspection",
            impact: "Prevent 450 customer impact",
        },
        A {
            icon: "🔮",
            text: "Service Degradation Forecast: Porto region predicted degradation within 48 hours (ML model)",
            confidence: "76%",
            severity: "High",
            action: "Proactive maintenance",
            impact: "1,200 customers affected",
        },
        A {
            icon: "📊",
            text: "Pattern Analysis: 85% of network complaints correlate with 'signal_loss' incident type",
            confidence: "95%",
            severity: "Info",
            action: "Infrastructure review",
            impact: "Root cause identified",
        },
        A {
            icon: "📢",
            text: "Proactive Communications: 1,200 customers in INC-2847 area should receive outage notification",
            confidence: "92%",
            severity: "High",
            action: "Send SMS alerts",
            impact: "Reduce complaints 60%",
        },
        A {
            icon: "🌐",
            text: "Capacity Planning: Lisboa region showing 23% traffic growth - recommend capacity upgrade by Q2",
            confidence: "89%",
            severity: "Medium",
            action: "Budget planning",
            impact: "Future-proof network",
        },
        A {
            icon: "⚡",
            text: "Peak Load Alert: Friday 14:00-16:00 shows 3.2x normal traffic - potential congestion risk",
            confidence: "91%",
            severity: "Medium",
            action: "Load balancing",
            impact: "Prevent service issues",
        },
        A {
            icon: "🔧",
            text: "Infrastructure Priority: 3 cell sites generating 40% of all network complaints - urgent upgrades needed",
            confidence: "94%",
            severity: "Critical",
            action: "Investment approval",
            impact: "€125K potential loss",
        },
        A {
            icon: "🎯",
            text: "Customer Retention: 45 high-value customers in affected areas - recommend service credits",
            confidence: "88%",
            severity: "High",
            action: "Retention offers",
            impact: "Save €67K revenue",
        },
    ]
}

fn billing_finance() -> Vec<Advisory> {
    use Advisory::BillingFinance as A;
    vec![
        A {
            icon: "💡",
            text: "Automated Resolution: ML model can handle 60% of disputes <€50 with 92% accuracy - save €12K/month",
            confidence: "92%",
            savings: "€12K/month",
            action: "Implement automation",
        },
        A {
            icon: "📋",
            text: "Invoice Optimization: Clarity improvements in bill layout could reduce disputes by 25% (tested via A/B)",
            confidence: "84%",
            savings: "€8.5K/month",
            action: "Update templates",
        },
        A {
            icon: "⚠️",
            text: "Churn Prevention: Customer BA-5623 shows dispute pattern (4 in 90 days) - immediate retention offer",
            confidence: "91%",
            savings: "€45K revenue at risk",
            action: "Executive intervention",
        },
        A {
            icon: "📈",
            text: "Revenue Recovery: €67K in resolvable disputes identified - prioritize 12 high-value cases",
            confidence: "88%",
            savings: "€67K recovery",
            action: "Priority queue",
        },
        A {
            icon: "🔮",
            text: "Forecast: Predicted €45K dispute-related churn this quarter based on historical patterns",
            confidence: "83%",
            savings: "€45K prevention",
            action: "Proactive outreach",
        },
        A {
            icon: "🎯",
            text: "Network Credit Automation: 78% of network-incident disputes can auto-credit - reduce processing time 85%",
            confidence: "89%",
            savings: "156 hrs/month",
            action: "Build automation",
        },
        A {
            icon: "💰",
            text: "Payment Plan Optimization: 23 customers benefit from flexible payment - retain €34K monthly recurring",
            confidence: "86%",
            savings: "€34K/month retention",
            action: "Offer payment plans",
        },
        A {
            icon: "📊",
            text: "Dispute Reduction: Gold tier customers have 2.3x dispute rate - personalized billing recommended",
            confidence: "90%",
            savings: "Reduce 30% disputes",
            action: "Segment strategy",
        },
    ]
}

fn revenue_optimization() -> Vec<Advisory> {
    use Advisory::RevenueOptimization as A;
    vec![
        A {
            icon: "🎯",
            text: "Tier Upgrade Opportunity: 247 Bronze customers with 3+ complaints → Silver tier ($180/yr each = $44K potential)",
            confidence: "91%",
            value: "€44K annual",
            action: "Send upgrade offer",
        },
        A {
            icon: "💎",
            text: "Premium Support Upsell: 89 Gold customers with high resolution satisfaction → Premium package ($540/yr = €48K)",
            confidence: "88%",
            value: "€48K annual",
            action: "Target campaign",
        },
        A {
            icon: "📡",
            text: "5G Cross-sell: 156 customers with network complaints → 5G upgrade ($25/mo each = €46K annual)",
            confidence: "84%",
            value: "€46K annual",
            action: "Proactive offer",
        },
        A {
            icon: "🔄",
            text: "Retention to Expansion: 34 at-risk customers successfully retained → upsell opportunity ($180 avg = €6K)",
            confidence: "79%",
            value: "€6K annual",
            action: "Follow-up campaign",
        },
        A {
            icon: "📱",
            text: "Multi-line Opportunity: 67 residential customers with business-like usage → business plans ($45/mo = €36K)",
            confidence: "86%",
            value: "€36K annual",
            action: "Sales qualification",
        },
        A {
            icon: "🛡️",
            text: "Insurance Add-on: 423 customers with device/technical issues → device protection ($8/mo = €40K annual)",
            confidence: "82%",
            value: "€40K annual",
            action: "Targeted marketing",
        },
    ]
}

fn data_analyst() -> Vec<Advisory> {
    use Advisory::DataAnalyst as A;
    vec![
        A {
            icon: "🔗",
            text: "Correlation Discovery: Network incidents → Social media complaints (Pearson r=0.82, p<0.001)",
            confidence: "96%",
            kind: "Correlation",
            finding: "Strong positive relationship",
        },
        A {
            icon: "📊",
            text: "Temporal Anomaly: Friday 14:00-16:00 shows 3.2x normal volume (Z-score: 2.8σ above mean)",
            confidence: "91%",
            kind: "Anomaly",
            finding: "Staffing optimization needed",
        },
        A {
            icon: "🎯",
            text: "Segmentation Insight: Gold tier customers 2.3x complaint rate but 50% higher CSAT (4.2 vs 2.8)",
            confidence: "93%",
            kind: "Insight",
            finding: "VIP treatment working",
        },
        A {
            icon: "🤖",
            text: "Model Performance: ARIMA forecast model 89% accurate for 7-day volume prediction (MAPE: 11%)",
            confidence: "89%",
            kind: "Model",
            finding: "Production-ready accuracy",
        },
        A {
            icon: "📈",
            text: "Trend Analysis: Chat channel growing 28% QoQ while Voice declining 12% - significant channel shift",
            confidence: "94%",
            kind: "Trend",
            finding: "Resource reallocation needed",
        },
        A {
            icon: "🔍",
            text: "Pattern Recognition: 85% of escalated cases have >72hr initial response time (high predictive power)",
            confidence: "92%",
            kind: "Pattern",
            finding: "Response time critical factor",
        },
        A {
            icon: "📉",
            text: "Outlier Detection: 3 customer segments show 5x normal dispute rate - investigate for data quality",
            confidence: "87%",
            kind: "Outlier",
            finding: "Data validation recommended",
        },
        A {
            icon: "🧬",
            text: "Cluster Analysis: K-means identified 4 distinct customer complaint profiles (silhouette score: 0.73)",
            confidence: "88%",
            kind: "Clustering",
            finding: "Segmentation model ready",
        },
    ]
}
