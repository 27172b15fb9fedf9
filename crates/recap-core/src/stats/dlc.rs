//! DLC pack naming.

/// Full in-game name of a DLC pack code
pub fn dlc_full_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "R" => "RESPECT",
        "RV" => "RESPECT/V",
        "P1" => "PORTABLE 1",
        "P2" => "PORTABLE 2",
        "GG" => "GUILTY GEAR",
        "CP" => "CLEAR PASS",
        "ES" => "EMOTIONAL S.",
        "TR" => "TRILOGY",
        "CE" => "CLAZZIQUAI",
        "BS" => "BLACK SQUARE",
        "T1" => "TECHNIKA 1",
        "T2" => "TECHNIKA 2",
        "T3" => "TECHNIKA 3",
        "P3" => "PORTABLE 3",
        "TQ" => "TECHNIKA T&Q",
        "VE" => "V EXTENSION",
        "VE2" => "V EXTENSION 2",
        "VE3" => "V EXTENSION 3",
        "VE4" => "V EXTENSION 4",
        "VE5" => "V EXTENSION 5",
        "VL" => "V LIBERTY",
        "VL2" => "V LIBERTY II",
        "VL3" => "V LIBERTY III",
        "VL4" => "V LIBERTY IV",
        "GC" => "GROOVE COASTER",
        "DM" => "DEEMO",
        "CY" => "CYTUS",
        "CHU" => "CHUNITHM",
        "MD" => "MUSE DASH",
        "EZ2" => "EZ2ON",
        "ARC" => "ARCAEA",
        "GF" => "GIRLS' FRONTLINE",
        "ESTI" => "ESTi",
        "NXN" => "NEXON",
        "MAP" => "MAPLESTORY",
        "FAL" => "FALCOM",
        "TEK" => "TEKKEN",
        "BA" => "BLUE ARCHIVE",
        "PLI1" => "PLI: TRIBUTE Vol.1",
        "PLI2" => "PLI: 64514 Part.1",
        _ => return None,
    };
    Some(name)
}

/// Name used to group records by pack: mapped code, then raw name, then code
pub fn resolve_dlc_full_name(dlc: &str, dlc_code: &str) -> Option<String> {
    let code = dlc_code.trim();
    if let Some(name) = dlc_full_name(code) {
        return Some(name.to_string());
    }
    non_empty(dlc).or_else(|| non_empty(code))
}

/// Short label for compact displays: code first, then raw name
pub fn resolve_dlc_short_name(dlc: &str, dlc_code: &str) -> Option<String> {
    non_empty(dlc_code.trim()).or_else(|| non_empty(dlc))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
