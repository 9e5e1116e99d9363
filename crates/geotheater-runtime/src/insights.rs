//! Narrative insights generated from aggregate statistics.
//!
//! An [`InsightProvider`] turns [`SummaryStatistics`] into an
//! [`InsightReport`]. [`InsightService`] wraps an optional provider and
//! guarantees a report is always returned: any failure yields the fixed
//! [`fallback_report`].

use async_trait::async_trait;
use geotheater_core::error::{DashboardError, Result};
use geotheater_core::models::{InsightReport, SummaryStatistics, TrendingStatus};
use serde::Serialize;

/// Number of subdistricts named in the prompt.
const PROMPT_TOP_ORIGINS: usize = 3;

/// A collaborator that produces narrative insights.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> String;

    async fn generate(&self, stats: &SummaryStatistics) -> Result<InsightReport>;
}

/// The report returned whenever insights cannot be produced.
pub fn fallback_report() -> InsightReport {
    InsightReport {
        summary: "AI Insights currently unavailable. Trends show consistent engagement from regional centers.".to_string(),
        recommendations: vec![
            "Monitor weekend traffic closely".to_string(),
            "Tailor programs for the dominant age group".to_string(),
        ],
        trending_status: TrendingStatus::Stable,
    }
}

/// Natural-language request describing `stats`.
pub fn build_prompt(stats: &SummaryStatistics) -> String {
    let origins = stats
        .top_subdistricts(PROMPT_TOP_ORIGINS)
        .into_iter()
        .map(|(name, count)| format!("{name} ({count})"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following visitor dashboard stats for Geotheater:\n\
         - Total Visitors: {total}\n\
         - Male vs Female: {male} vs {female}\n\
         - Age Groups: Children({child}), Teens({teen}), Adults({adult}), Seniors({senior})\n\
         - Top Origins: {origins}\n\
         \n\
         Provide a concise analysis including a summary of trends, actionable \
         recommendations for management, and a trending status. Respond with a \
         JSON object with the fields \"summary\" (string), \"recommendations\" \
         (array of strings) and \"trendingStatus\" (one of \"up\", \"down\", \"stable\").",
        total = stats.total,
        male = stats.total_male,
        female = stats.total_female,
        child = stats.child,
        teen = stats.teen,
        adult = stats.adult,
        senior = stats.senior,
    )
}

// ── HttpInsightProvider ───────────────────────────────────────────────────────

/// Request body sent to the insight endpoint.
#[derive(Serialize)]
struct InsightRequest<'a> {
    prompt: String,
    stats: &'a SummaryStatistics,
}

/// Posts the prompt and statistics to a JSON endpoint that answers with an
/// [`InsightReport`].
pub struct HttpInsightProvider {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpInsightProvider {
    pub fn new(endpoint: String, api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl InsightProvider for HttpInsightProvider {
    fn name(&self) -> String {
        self.endpoint.clone()
    }

    async fn generate(&self, stats: &SummaryStatistics) -> Result<InsightReport> {
        let body = InsightRequest {
            prompt: build_prompt(stats),
            stats,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::HttpStatus {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;
        serde_json::from_str(text.trim())
            .map_err(|e| DashboardError::Insight(format!("unexpected response body: {e}")))
    }
}

// ── InsightService ────────────────────────────────────────────────────────────

/// Always-succeeding front for an optional [`InsightProvider`].
pub struct InsightService {
    provider: Option<Box<dyn InsightProvider>>,
}

impl InsightService {
    pub fn new(provider: Box<dyn InsightProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A service with no provider; every request yields the fallback.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// The provider's report, or [`fallback_report`] on any failure.
    pub async fn insights_or_fallback(&self, stats: &SummaryStatistics) -> InsightReport {
        let Some(provider) = &self.provider else {
            tracing::info!("no insight provider configured; using fallback report");
            return fallback_report();
        };

        match provider.generate(stats).await {
            Ok(report) => {
                tracing::debug!(provider = %provider.name(), status = report.trending_status.as_str(), "insights generated");
                report
            }
            Err(e) => {
                tracing::error!(error = %e, provider = %provider.name(), "insight generation failed");
                fallback_report()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stats() -> SummaryStatistics {
        let mut s = SummaryStatistics {
            total: 120,
            total_male: 50,
            total_female: 70,
            child: 2,
            teen: 80,
            adult: 9,
            senior: 1,
            individual_visits: 12,
            group_visits: 3,
            ..Default::default()
        };
        for (name, count) in [("Coblong", 60), ("Lembang", 30), ("Cidadap", 20), ("Sukajadi", 10)] {
            s.subdistricts.insert(name.to_string(), count);
        }
        s
    }

    fn provider(server: &MockServer, api_key: Option<&str>) -> HttpInsightProvider {
        HttpInsightProvider::new(
            format!("{}/insights", server.uri()),
            api_key.map(str::to_string),
            reqwest::Client::new(),
        )
    }

    /// Provider that always fails.
    struct Broken;

    #[async_trait]
    impl InsightProvider for Broken {
        fn name(&self) -> String {
            "broken".to_string()
        }

        async fn generate(&self, _stats: &SummaryStatistics) -> Result<InsightReport> {
            Err(DashboardError::Insight("boom".to_string()))
        }
    }

    // ── build_prompt ──────────────────────────────────────────────────────

    #[test]
    fn test_prompt_mentions_totals_and_top_three_origins() {
        let prompt = build_prompt(&stats());
        assert!(prompt.contains("Total Visitors: 120"));
        assert!(prompt.contains("Male vs Female: 50 vs 70"));
        assert!(prompt.contains("Children(2), Teens(80), Adults(9), Seniors(1)"));
        assert!(prompt.contains("Coblong (60), Lembang (30), Cidadap (20)"));
        assert!(!prompt.contains("Sukajadi"));
        assert!(prompt.contains("trendingStatus"));
    }

    #[test]
    fn test_fallback_report_contents() {
        let r = fallback_report();
        assert_eq!(r.trending_status, TrendingStatus::Stable);
        assert_eq!(r.recommendations.len(), 2);
        assert!(r.summary.starts_with("AI Insights currently unavailable"));
    }

    // ── HttpInsightProvider ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_http_provider_parses_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/insights"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({ "stats": { "total": 120 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": "School groups drive traffic",
                "recommendations": ["Add weekday guides"],
                "trendingStatus": "up"
            })))
            .mount(&server)
            .await;

        let report = provider(&server, Some("secret")).generate(&stats()).await.unwrap();
        assert_eq!(report.summary, "School groups drive traffic");
        assert_eq!(report.trending_status, TrendingStatus::Up);
    }

    #[tokio::test]
    async fn test_http_provider_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = provider(&server, None).generate(&stats()).await.unwrap_err();
        assert!(matches!(err, DashboardError::HttpStatus { status: 429, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_http_provider_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server, None).generate(&stats()).await.unwrap_err();
        assert!(matches!(err, DashboardError::Insight(_)), "got {err:?}");
    }

    // ── InsightService ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_service_disabled_returns_fallback() {
        let service = InsightService::disabled();
        assert!(!service.is_configured());
        assert_eq!(service.insights_or_fallback(&stats()).await, fallback_report());
    }

    #[tokio::test]
    async fn test_service_provider_failure_returns_fallback() {
        let service = InsightService::new(Box::new(Broken));
        assert!(service.is_configured());
        assert_eq!(service.insights_or_fallback(&stats()).await, fallback_report());
    }

    #[tokio::test]
    async fn test_service_passes_through_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": "Quiet week",
                "recommendations": [],
                "trendingStatus": "down"
            })))
            .mount(&server)
            .await;

        let service = InsightService::new(Box::new(provider(&server, None)));
        let report = service.insights_or_fallback(&stats()).await;
        assert_eq!(report.trending_status, TrendingStatus::Down);
    }
}
