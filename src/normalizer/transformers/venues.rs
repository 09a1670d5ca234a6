use super::{EndpointTransformer, RecordKind};
use crate::normalizer::models::LogicalField;

const FIELDS: &[LogicalField] = &[
    LogicalField::numeric("id", &["id", "venueId", "venue_id"]),
    LogicalField::new("source_id", &["sourceId", "source_id"]),
    LogicalField::new("name", &["name", "venue"]),
    LogicalField::new("city", &["city", "location.city"]),
    LogicalField::new("state", &["state", "location.state"]),
    LogicalField::new("country", &["country", "location.country"]),
    LogicalField::numeric("capacity", &["capacity"]),
    LogicalField::boolean("indoor", &["indoor", "dome"]),
];

pub static TRANSFORMER: EndpointTransformer = EndpointTransformer {
    kind: RecordKind::Venue,
    fields: FIELDS,
    nested: &[],
    expansions: &[],
    calculated: &[],
};
