/// Plural route segment -> singular entity name used for permission lookups.
const ROUTE_ENTITIES: &[(&str, &str)] = &[
    ("companies", "company"),
    ("orders", "order"),
    ("users", "user"),
];

/// Resolves a route segment to its entity name. Unknown segments pass
/// through unchanged.
pub fn resolve_route_entity(segment: &str) -> &str {
    ROUTE_ENTITIES
        .iter()
        .find(|(route, _)| *route == segment)
        .map(|(_, entity)| *entity)
        .unwrap_or(segment)
}
