use anyhow::{Context, Result, anyhow};
use metar_core::{CloudLayer, Coverage};

/// Parse a sky-cover group in METAR notation, e.g. `BKN035` or `OVC010CB`.
///
/// Heights are hundreds of feet; any suffix after the height (CB, TCU) is ignored.
pub fn parse_layer(token: &str) -> Result<CloudLayer> {
    let token = token.trim().to_ascii_uppercase();
    let split = token.find(|c: char| c.is_ascii_digit()).unwrap_or(token.len());
    let (code, rest) = token.split_at(split);

    if code.is_empty() {
        return Err(anyhow!("Sky layer '{token}' has no coverage code"));
    }

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let base = if digits.is_empty() {
        None
    } else {
        let hundreds: u32 = digits
            .parse()
            .with_context(|| format!("Invalid height in sky layer '{token}'"))?;
        let feet = hundreds
            .checked_mul(100)
            .ok_or_else(|| anyhow!("Height in sky layer '{token}' is too large"))?;
        Some(feet)
    };

    Ok(CloudLayer::new(Coverage::from(code), base))
}
