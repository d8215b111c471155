const FLAG_URL_BASE: &str = "https://flagcdn.com/w320";
const PLACEHOLDER_FLAG_URL: &str = "https://flagcdn.com/w320/un.png";

/// (team, flagcdn country code, short label)
const TEAMS: &[(&str, &str, &str)] = &[
    ("Afghanistan", "af", "AFG"),
    ("Australia", "au", "AUS"),
    ("Bangladesh", "bd", "BAN"),
    ("England", "gb", "ENG"),
    ("India", "in", "IND"),
    ("Ireland", "ie", "IRE"),
    ("Kenya", "ke", "KEN"),
    ("Netherlands", "nl", "NED"),
    ("New Zealand", "nz", "NZ"),
    ("Pakistan", "pk", "PAK"),
    ("South Africa", "za", "SA"),
    ("Sri Lanka", "lk", "SL"),
    ("USA", "us", "USA"),
    ("United States of America", "us", "USA"),
    ("West Indies", "jm", "WI"),
    ("Zimbabwe", "zw", "ZIM"),
];

fn lookup(team: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    let team = team.trim();
    TEAMS.iter().find(|(name, _, _)| name.eq_ignore_ascii_case(team))
}

/// Flag image URL for a team; unknown teams get a neutral placeholder.
pub fn flag_url(team: &str) -> String {
    match lookup(team) {
        Some((_, code, _)) => format!("{FLAG_URL_BASE}/{code}.png"),
        None => PLACEHOLDER_FLAG_URL.to_string(),
    }
}

/// Short label for narrow columns. Falls back to the first three letters.
pub fn team_code(team: &str) -> String {
    if let Some((_, _, label)) = lookup(team) {
        return (*label).to_string();
    }
    team.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_flags() {
        assert_eq!(flag_url("India"), "https://flagcdn.com/w320/in.png");
        assert_eq!(flag_url(" pakistan "), "https://flagcdn.com/w320/pk.png");
        assert_eq!(flag_url("England"), "https://flagcdn.com/w320/gb.png");
        assert_eq!(flag_url("Atlantis"), PLACEHOLDER_FLAG_URL);
    }

    #[test]
    fn codes() {
        assert_eq!(team_code("Sri Lanka"), "SL");
        assert_eq!(team_code("Scotland"), "SCO");
    }
}
