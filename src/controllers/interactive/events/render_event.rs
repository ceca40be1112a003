use crate::controllers::interactive::data::render_summary::RenderSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Progress { generation: u64, percent: u8 },
    Finished(RenderSummary),
}

impl RenderEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Progress { generation, .. } => *generation,
            Self::Finished(summary) => summary.generation,
        }
    }
}
