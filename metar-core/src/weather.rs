//! Present-weather group decoding (`+SHRA`, `VCFG`, `-FZDZ`, ...).

const TORNADO: &str = "+FC";

const DESCRIPTORS: &[(&str, &str)] = &[
    ("MI", "shallow"),
    ("PR", "partial"),
    ("BC", "patches of"),
    ("DR", "low drifting"),
    ("BL", "blowing"),
    ("SH", "showers of"),
    ("TS", "thunderstorm"),
    ("FZ", "freezing"),
];

const PRECIPITATION: &[(&str, &str)] = &[
    ("DZ", "drizzle"),
    ("RA", "rain"),
    ("SN", "snow"),
    ("SG", "snow grains"),
    ("IC", "ice crystals"),
    ("PL", "ice pellets"),
    ("GR", "hail"),
    ("GS", "small hail/snow pellets"),
    ("UP", "unknown precipitation"),
];

const OBSCURATION: &[(&str, &str)] = &[
    ("BR", "mist"),
    ("FG", "fog"),
    ("FU", "smoke"),
    ("VA", "volcanic ash"),
    ("DU", "widespread dust"),
    ("SA", "sand"),
    ("HZ", "haze"),
    ("PY", "spray"),
];

const OTHER: &[(&str, &str)] = &[
    ("PO", "dust/sand whirls"),
    ("SQ", "squalls"),
    ("FC", "funnel cloud"),
    ("SS", "sandstorm/duststorm"),
];

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, phrase)| *phrase)
}

/// Decode a compact present-weather code into a sentence.
///
/// Anything the tables do not recognize is skipped two characters at a time; if
/// nothing at all is recognized the input is handed back unchanged.
pub fn decode_weather(code: &str) -> String {
    if code == TORNADO {
        return "Tornado or waterspout".to_string();
    }

    let mut rest = code;
    let mut vicinity = false;
    let mut intensity = None;

    if let Some(after) = rest.strip_prefix("VC") {
        vicinity = true;
        rest = after;
    } else if let Some(after) = rest.strip_prefix('-') {
        intensity = Some("Light");
        rest = after;
    } else if let Some(after) = rest.strip_prefix('+') {
        intensity = Some("Heavy");
        rest = after;
    }

    let mut descriptor = None;
    let mut phenomena = Vec::new();

    let chars: Vec<char> = rest.chars().collect();
    for pair in chars.chunks_exact(2) {
        let token: String = pair.iter().collect();
        let token = token.as_str();

        if let Some(phrase) = lookup(DESCRIPTORS, token) {
            descriptor = Some(phrase);
        } else if let Some(phrase) = lookup(PRECIPITATION, token)
            .or_else(|| lookup(OBSCURATION, token))
            .or_else(|| lookup(OTHER, token))
        {
            phenomena.push(phrase);
        }
    }

    let mut words: Vec<String> = Vec::with_capacity(4);
    if let Some(intensity) = intensity {
        words.push(intensity.to_string());
    }
    if let Some(descriptor) = descriptor {
        words.push(descriptor.to_string());
    }
    if !phenomena.is_empty() {
        words.push(phenomena.join(" and "));
    }
    if vicinity {
        words.push("in vicinity".to_string());
    }

    if words.is_empty() {
        return code.to_string();
    }

    capitalize(&words.join(" "))
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
