use super::{EndpointTransformer, RecordKind};
use crate::normalizer::models::LogicalField;

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("id", &["id", "teamId", "team_id"]),
    LogicalField::new("source_id", &["sourceId", "source_id"]),
    LogicalField::new("school", &["school", "name", "team"]),
    LogicalField::new("mascot", &["mascot"]),
    LogicalField::new("abbreviation", &["abbreviation"]),
    LogicalField::new("display_name", &["displayName", "display_name"]),
    LogicalField::new("short_display_name", &["shortDisplayName", "short_display_name"]),
    LogicalField::new("primary_color", &["primaryColor", "primary_color", "color"]),
    LogicalField::new("secondary_color", &["secondaryColor", "secondary_color", "alternateColor"]),
    LogicalField::numeric("current_venue_id", &["currentVenueId", "current_venue_id"]),
    LogicalField::new("current_venue", &["currentVenue", "current_venue"]),
    LogicalField::new("current_city", &["currentCity", "current_city"]),
    LogicalField::new("current_state", &["currentState", "current_state"]),
    LogicalField::numeric("conference_id", &["conferenceId", "conference_id"]),
    LogicalField::new("conference", &["conference", "conference.name"]),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Team,
    fields: FIELDS,
    nested: &[],
    expansions: &[],
    calculated: &[],
};
