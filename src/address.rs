/// Builds a single display address from ordered, optional fragments.
///
/// Fragments that are absent or blank after trimming are dropped. The rest
/// are joined in the order given with `", "`. A fragment is kept as given;
/// trimming only decides whether it is blank. Nothing is reordered or
/// deduplicated, so callers choose the fragment order.
///
/// Returns an empty string when no fragment survives.
pub fn normalize_address(fragments: &[Option<&str>]) -> String {
    fragments
        .iter()
        .flatten()
        .filter(|fragment| !fragment.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}
