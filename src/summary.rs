use crate::models::{Category, IssueReport, Recommendation, Summary};
use crate::scoring::score_breakdown;

pub struct SummaryInput<'a> {
    pub domain: &'a str,
    pub analysis_date: String,
    pub total_pages: usize,
    pub overall_score: u8,
    pub category_scores: &'a [(Category, u8)],
    pub issues: &'a IssueReport,
    pub recommendations: &'a [Recommendation],
}

pub fn build(input: SummaryInput) -> Summary {
    Summary {
        report_title: format!("Site Health Report: {}", input.domain),
        domain: input.domain.to_string(),
        analysis_date: input.analysis_date,
        total_pages_analyzed: input.total_pages,
        overall_score: input.overall_score,
        total_issues: input.issues.total(),
        total_recommendations: input.recommendations.len(),
        score_breakdown: score_breakdown(input.category_scores.iter().map(|&(_, score)| score)),
    }
}
