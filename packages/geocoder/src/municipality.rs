//! China's four centrally-administered municipalities.
//!
//! For these the provider reports the municipality's full administrative
//! name as the province (e.g. "北京市") and leaves `city` empty, so the
//! city is taken from this table and the province is left out of
//! synthesized display names.

/// Full administrative name and short display name of each municipality.
pub const MUNICIPALITIES: &[(&str, &str)] = &[
    ("北京市", "北京"),
    ("上海市", "上海"),
    ("天津市", "天津"),
    ("重庆市", "重庆"),
];

/// Maps a municipality's full province name to its short display form.
///
/// Returns `None` for anything that is not exactly one of the four
/// names in [`MUNICIPALITIES`].
#[must_use]
pub fn municipality_short_name(province: &str) -> Option<&'static str> {
    MUNICIPALITIES
        .iter()
        .find(|(full, _)| *full == province)
        .map(|(_, short)| *short)
}

/// Whether `province` names a municipality.
#[must_use]
pub fn is_municipality(province: &str) -> bool {
    municipality_short_name(province).is_some()
}
