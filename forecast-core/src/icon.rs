//! Translation of provider icon codes into the canonical icon tokens used by
//! templates (`skc`, `few`, `sct`, `ovc`, `tsra`, ...).

use crate::error::{Error, Result};

/// Canonical token for an AccuWeather icon code.
pub fn accuweather_icon(code: u32) -> Result<&'static str> {
    let token = match code {
        1 => "skc",       // sunny
        2 => "few",       // mostly sunny
        3 => "sct",       // partly sunny
        4 => "sct",       // intermittent clouds
        5 => "few",       // hazy sunshine
        6 => "sct",       // mostly cloudy
        7 => "ovc",       // cloudy
        8 => "ovc",       // dreary
        11 => "fg",       // fog
        12 => "shra",     // showers
        13 => "shra",     // mostly cloudy w/ showers
        14 => "hi_shwrs", // partly sunny w/ showers
        15 => "tsra",     // t-storms
        16 => "tsra",     // mostly cloudy w/ t-storms
        17 => "tsra",     // partly sunny w/ t-storms
        18 => "ra",       // rain
        19 => "sn",       // flurries
        20 => "sn",       // mostly cloudy w/ flurries
        21 => "sn",       // partly sunny w/ flurries
        22 => "blizzard", // snow
        23 => "sn",       // mostly cloudy w/ snow
        24 => "ip",       // ice
        25 => "fzra",     // sleet
        26 => "fzra",     // freezing rain
        29 => "mix",      // rain and snow
        30 => "hot",
        31 => "cold",
        32 => "wind",
        33 => "skc",      // clear
        34 => "few",      // mostly clear
        35 => "sct",      // partly cloudy
        36 => "sct",      // intermittent clouds
        37 => "few",      // hazy moonlight
        38 => "sct",      // mostly cloudy
        39 => "hi_shwrs", // partly cloudy w/ showers
        40 => "shra",     // mostly cloudy w/ showers
        41 => "tsra",     // partly cloudy w/ t-storms
        42 => "tsra",     // mostly cloudy w/ t-storms
        43 => "sn",       // mostly cloudy w/ flurries
        44 => "sn",       // mostly cloudy w/ snow
        _ => return Err(unknown("AccuWeather", code)),
    };

    Ok(token)
}

/// Canonical token for a WMO World Weather icon code.
pub fn wmo_icon(code: u32) -> Result<&'static str> {
    let token = match code {
        101..=104 => "du", // sandstorm, duststorm, sand, dust
        201..=203 => "tsra",
        204 => "scttsra", // lightning
        301 => "ip",      // hail
        401 | 403 => "sn",
        402 | 404 => "blizzard",
        501 | 502 => "sn", // snow showers, flurries
        601..=603 => "sn",
        701 => "sn",
        801 => "fzra", // sleet
        901..=903 => "shra",
        1001 | 1002 | 1101 => "hi_shwrs", // occasional, scattered, isolated showers
        1201 => "shra",
        1301 => "fzra",
        1401 | 1501 | 1502 => "ra", // rain, drizzle, light rain
        1601 | 1701 => "fg",        // fog, mist
        1801 => "fu",               // smoke
        1901 => "fg",               // haze
        2001 => "ovc",
        2101 | 2102 => "bkn", // sunny intervals, no rain
        2103 => "few",        // clearing
        2201..=2204 => "sct",
        2301 => "ovc",
        2302 => "bkn",
        2401..=2403 | 2501 | 2502 => "skc",
        2601..=2604 => "wind",
        2701 => "ra",  // wet
        2702 => "hot", // humid
        2801 => "hot", // dry
        2901 | 3001 => "cold",
        3101 => "hot",
        3201 | 3202 => "cold",
        3301 => "hot",
        3401 => "cold",
        3501 => "fu", // volcanic ash
        _ => return Err(unknown("WMO", code)),
    };

    Ok(token)
}

/// Icon token from a weather.gov icon URL.
///
/// `.../fcicons/skc20.png` becomes `skc`: last path segment, extension
/// dropped, trailing probability digits stripped.
pub fn icon_token_from_link(link: &str) -> String {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };

    stem.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
}

fn unknown(provider: &str, code: u32) -> Error {
    Error::Data(format!("unknown {provider} icon code {code}"))
}
