use crate::model::{CloudLayer, Coverage};

pub const CLEAR_SKIES: &str = "Clear skies";
pub const NO_CLOUD_DATA: &str = "No cloud data available";

/// Human-readable phrase for a coverage code. Unknown codes are returned as-is.
pub fn coverage_phrase(cover: &Coverage) -> &str {
    match cover {
        Coverage::Clr => "Clear",
        Coverage::Cavok => "Ceiling and Visibility OK",
        Coverage::Few => "Few",
        Coverage::Sct => "Scattered",
        Coverage::Bkn => "Broken",
        Coverage::Ovc => "Overcast",
        Coverage::Ovx => "Sky Obscured",
        Coverage::Other(code) => code,
    }
}

/// Describe a list of sky layers, e.g. `"Few at 8,000 ft; Broken at 25,000 ft"`.
///
/// The first CLR or CAVOK layer wins outright: its phrase is returned alone and the
/// remaining layers are never looked at.
pub fn decode_clouds(layers: &[CloudLayer]) -> String {
    if layers.is_empty() {
        return CLEAR_SKIES.to_string();
    }

    let mut parts = Vec::with_capacity(layers.len());

    for layer in layers {
        if layer.cover.is_clear() {
            return coverage_phrase(&layer.cover).to_string();
        }

        let mut part = coverage_phrase(&layer.cover).to_string();
        if let Some(base) = layer.base {
            part.push_str(&format!(" at {} ft", with_thousands(base)));
        }
        if let Some(top) = layer.top {
            part.push_str(&format!(" (tops {} ft)", with_thousands(top)));
        }
        parts.push(part);
    }

    if parts.is_empty() {
        return NO_CLOUD_DATA.to_string();
    }

    parts.join("; ")
}

fn with_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
