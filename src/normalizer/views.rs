//! Focused slices of an assembled table, each tied to one record kind.

use crate::error::AppError;
use crate::normalizer::table::Table;
use crate::normalizer::transformers::{RecordKind, lines, plays, ratings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// Plays that changed the score
    ScoringPlays,
    /// Plays in game-clock order
    GameFlow,
    PlayTypes {
        play_type: Option<String>,
        team: Option<String>,
    },
    ProviderLines {
        provider: Option<String>,
    },
    /// Lines of one team from its perspective, oldest first
    LineTrends {
        team: String,
    },
    SpRatings,
    CompareRatings {
        team: Option<String>,
    },
}

impl TableView {
    /// The record kind whose table this view reads
    pub fn kind(&self) -> RecordKind {
        match self {
            TableView::ScoringPlays | TableView::GameFlow | TableView::PlayTypes { .. } => {
                RecordKind::Play
            }
            TableView::ProviderLines { .. } | TableView::LineTrends { .. } => RecordKind::Line,
            TableView::SpRatings | TableView::CompareRatings { .. } => RecordKind::Rating,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableView::ScoringPlays => "scoring-plays",
            TableView::GameFlow => "game-flow",
            TableView::PlayTypes { .. } => "play-types",
            TableView::ProviderLines { .. } => "provider-lines",
            TableView::LineTrends { .. } => "line-trends",
            TableView::SpRatings => "sp-ratings",
            TableView::CompareRatings { .. } => "compare-ratings",
        }
    }

    /// Checks the view against the kind of the table it will be applied to.
    ///
    /// # Errors
    /// [`AppError::Config`] when the view belongs to another record kind.
    pub fn check_kind(&self, kind: RecordKind) -> Result<(), AppError> {
        if self.kind() == kind {
            return Ok(());
        }
        Err(AppError::config_error(format!(
            "View '{}' applies to {} records, not {kind}",
            self.name(),
            self.kind()
        )))
    }

    pub fn apply(&self, table: &Table) -> Table {
        match self {
            TableView::ScoringPlays => plays::scoring_plays(table),
            TableView::GameFlow => plays::game_flow(table),
            TableView::PlayTypes { play_type, team } => {
                plays::play_types(table, play_type.as_deref(), team.as_deref())
            }
            TableView::ProviderLines { provider } => {
                lines::provider_lines(table, provider.as_deref())
            }
            TableView::LineTrends { team } => lines::line_trends(table, team),
            TableView::SpRatings => ratings::sp_ratings(table),
            TableView::CompareRatings { team } => ratings::compare_ratings(table, team.as_deref()),
        }
    }
}
