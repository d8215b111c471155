use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// 1-based line in the source file; the header is line 1.
    pub line: usize,
    pub date_text: String,
    pub date: NaiveDate,
    pub year: i32,
    pub team_a: String,
    pub team_b: String,
    pub winner: Winner,
    pub margin: Margin,
    pub ground: String,
    pub toss_raw: String,
    pub toss_winner: String,
    pub toss_decision: TossDecision,
}

impl MatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }

    pub fn winner_name(&self) -> Option<&str> {
        match &self.winner {
            Winner::Team(name) => Some(name.as_str()),
            Winner::NoResult => None,
        }
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.team_a == team {
            Some(self.team_b.as_str())
        } else if self.team_b == team {
            Some(self.team_a.as_str())
        } else {
            None
        }
    }

    /// `Some(true)` when the toss winner also won the match; `None` when either
    /// side of that comparison is unknown.
    pub fn toss_winner_won(&self) -> Option<bool> {
        let winner = self.winner_name()?;
        if self.toss_winner == UNKNOWN || !self.involves(&self.toss_winner) {
            return None;
        }
        Some(winner == self.toss_winner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Winner {
    Team(String),
    /// Tie, abandoned or washed out.
    NoResult,
}

impl Winner {
    /// Resolves a raw winner cell against the two listed teams. Returns `None`
    /// when the value names neither team and is not a no-result marker.
    pub fn resolve(raw: &str, team_a: &str, team_b: &str) -> Option<Winner> {
        let raw = raw.trim();
        if is_no_result(raw) {
            return Some(Winner::NoResult);
        }
        [team_a, team_b]
            .into_iter()
            .find(|team| team.eq_ignore_ascii_case(raw))
            .map(|team| Winner::Team(team.to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            Winner::Team(name) => name,
            Winner::NoResult => "no result",
        }
    }
}

fn is_no_result(raw: &str) -> bool {
    const MARKERS: &[&str] = &["no result", "abandon", "tied", "tie", "n/r", "draw"];
    let lower = raw.to_ascii_lowercase();
    lower.is_empty()
        || lower == "-"
        || lower == "nr"
        || MARKERS.iter().any(|m| lower == *m || lower.starts_with(&format!("{m} ")))
        || lower.contains("abandon")
        || lower.contains("no result")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginUnit {
    Runs,
    Wickets,
    Unknown,
}

/// Victory margin as written in the source. Values in different units are
/// not comparable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Margin {
    pub text: String,
    pub value: Option<u32>,
    pub unit: MarginUnit,
}

impl Margin {
    pub fn parse(raw: &str) -> Margin {
        let text = raw.trim().to_string();
        let lower = text.to_ascii_lowercase();
        let value = lower
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| !part.is_empty())
            .and_then(|digits| digits.parse::<u32>().ok());
        let unit = if lower.contains("run") {
            MarginUnit::Runs
        } else if lower.contains("wicket") || lower.contains("wkt") {
            MarginUnit::Wickets
        } else {
            MarginUnit::Unknown
        };
        let value = if unit == MarginUnit::Unknown { None } else { value };
        Margin { text, value, unit }
    }

    pub fn same_unit(&self, other: &Margin) -> bool {
        self.unit != MarginUnit::Unknown && self.unit == other.unit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TossDecision {
    Bat,
    Field,
    Unknown,
}

impl TossDecision {
    pub fn label(self) -> &'static str {
        match self {
            TossDecision::Bat => "bat",
            TossDecision::Field => "field",
            TossDecision::Unknown => UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toss {
    pub winner: String,
    pub decision: TossDecision,
}

impl Toss {
    /// Splits `"<team>, elected to <bat|field>"`. Anything else degrades to an
    /// unknown decision, keeping the text before the first comma as winner.
    pub fn parse(raw: &str) -> Toss {
        let Some((team, rest)) = raw.split_once(',') else {
            return Toss::unknown(UNKNOWN);
        };
        let team = team.trim();
        let team = if team.is_empty() { UNKNOWN } else { team };

        let rest = rest.trim().to_ascii_lowercase();
        let choice = ["elected to ", "chose to ", "opted to "]
            .iter()
            .find_map(|prefix| rest.strip_prefix(prefix))
            .and_then(|choice| choice.split_whitespace().next())
            .map(|word| word.trim_matches(|c: char| !c.is_ascii_alphabetic()));
        let decision = match choice {
            Some("bat") => TossDecision::Bat,
            Some("field") | Some("bowl") => TossDecision::Field,
            _ => return Toss::unknown(team),
        };
        Toss {
            winner: team.to_string(),
            decision,
        }
    }

    fn unknown(winner: &str) -> Toss {
        Toss {
            winner: winner.to_string(),
            decision: TossDecision::Unknown,
        }
    }
}

/// Date formats observed in scorecard exports; month-first wins for ambiguous
/// numeric dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d-%b-%y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok().filter(plausible))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
                .filter(plausible)
        })
}

// Short years slip through `%Y` as year 17 and so on.
fn plausible(date: &NaiveDate) -> bool {
    (1900..=2100).contains(&date.year())
}

pub fn year_of(date: NaiveDate) -> i32 {
    date.year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toss_examples() {
        let toss = Toss::parse("India, elected to bat");
        assert_eq!(toss.winner, "India");
        assert_eq!(toss.decision, TossDecision::Bat);

        let toss = Toss::parse("malformed string");
        assert_eq!(toss.winner, UNKNOWN);
        assert_eq!(toss.decision, TossDecision::Unknown);
    }

    #[test]
    fn toss_keeps_team_when_choice_is_garbled() {
        let toss = Toss::parse("Sri Lanka, won the toss");
        assert_eq!(toss.winner, "Sri Lanka");
        assert_eq!(toss.decision, TossDecision::Unknown);

        let toss = Toss::parse(" , elected to field");
        assert_eq!(toss.winner, UNKNOWN);
        assert_eq!(toss.decision, TossDecision::Field);
    }

    #[test]
    fn toss_accepts_bowl_and_case() {
        assert_eq!(
            Toss::parse("England, Elected To Bowl").decision,
            TossDecision::Field
        );
        assert_eq!(Toss::parse("").decision, TossDecision::Unknown);
    }

    #[test]
    fn toss_reads_the_first_word_after_the_prefix() {
        let toss = Toss::parse("India, elected to bat first");
        assert_eq!(toss.winner, "India");
        assert_eq!(toss.decision, TossDecision::Bat);

        assert_eq!(
            Toss::parse("Pakistan, elected to field first").decision,
            TossDecision::Field
        );
        assert_eq!(
            Toss::parse("Australia, chose to bowl.").decision,
            TossDecision::Field
        );
        assert_eq!(
            Toss::parse("England, elected to batten down").decision,
            TossDecision::Unknown
        );
    }

    #[test]
    fn winner_resolution() {
        assert_eq!(
            Winner::resolve("india", "India", "Pakistan"),
            Some(Winner::Team("India".to_string()))
        );
        assert_eq!(
            Winner::resolve("no result", "India", "Pakistan"),
            Some(Winner::NoResult)
        );
        assert_eq!(
            Winner::resolve("Match abandoned", "India", "Pakistan"),
            Some(Winner::NoResult)
        );
        assert_eq!(Winner::resolve("Kenya", "India", "Pakistan"), None);
    }

    #[test]
    fn margin_units() {
        let runs = Margin::parse("124 runs");
        assert_eq!(runs.value, Some(124));
        assert_eq!(runs.unit, MarginUnit::Runs);

        let wickets = Margin::parse("8 wickets");
        assert_eq!(wickets.unit, MarginUnit::Wickets);
        assert!(!runs.same_unit(&wickets));

        let other = Margin::parse("D/L method");
        assert_eq!(other.unit, MarginUnit::Unknown);
        assert_eq!(other.value, None);
        assert!(!other.same_unit(&other));
    }

    #[test]
    fn dates_in_several_formats() {
        for raw in ["2017-06-04", "Jun 4, 2017", "4 June 2017", "06/04/2017", "2017-06-04 14:30:00"] {
            let date = parse_match_date(raw).unwrap_or_else(|| panic!("{raw} should parse"));
            assert_eq!(year_of(date), 2017);
        }
        assert!(parse_match_date("sometime in June").is_none());
        assert!(parse_match_date("").is_none());
    }
}
