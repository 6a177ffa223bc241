use authority_sdk::OrgUnit;

/// The deepest org unit by materialized path; ties keep the first seen.
#[must_use]
pub fn pick_most_specific(units: &[OrgUnit]) -> Option<&OrgUnit> {
    let mut best: Option<(&OrgUnit, usize)> = None;
    for unit in units {
        let depth = unit.depth();
        if best.is_none_or(|(_, d)| depth > d) {
            best = Some((unit, depth));
        }
    }
    best.map(|(unit, _)| unit)
}
