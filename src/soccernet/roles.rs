//! Tracklet role decoding.
//!
//! A tracklet is declared in `gameinfo.ini` as
//! `trackletID_<i>=<role phrase>;<extra info>`, for example
//! `player team left;10`, `goalkeepers team right;1`, `referee;main`,
//! `ball;1` or `other;staff`. The role phrase is matched against an ordered
//! list of keywords; the first match decides the variant.

use crate::dataset::{Role, Team};
use crate::{Error, Result};

/// Attributes of one tracklet, joined onto each of its detections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackletRole {
    pub team: Option<Team>,
    pub role: Role,
    pub jersey_number: Option<u32>,
    pub position: Option<String>,
    pub category: String,
}

/// `(tracklet index, normalized phrase, extra info)`
type Resolver = fn(u32, &str, &str) -> Result<TrackletRole>;

/// Variants in priority order. `Role::Other` is the fallback and must still
/// be named by the phrase.
const VARIANTS: &[(&str, Resolver)] = &[
    ("goalkeeper", resolve_goalkeeper),
    ("player", resolve_player),
    ("referee", resolve_referee),
    ("ball", resolve_ball),
    ("other", resolve_other),
];

impl TrackletRole {
    /// Decode a tracklet descriptor.
    ///
    /// # Arguments
    /// * `tracklet_index` - 1-based index the descriptor was declared under
    /// * `descriptor` - `"<role phrase>;<extra info>"`
    ///
    /// # Errors
    /// * `MalformedConfig` if the descriptor has no `;`
    /// * `UnknownTeam` if a player/goalkeeper phrase names neither side
    /// * `UnknownRole` if no variant keyword is present
    /// * `MalformedConfig` if a jersey number does not fit in a `u32`
    pub fn resolve(tracklet_index: u32, descriptor: &str) -> Result<Self> {
        let (phrase, info) = descriptor.split_once(';').ok_or_else(|| {
            malformed(tracklet_index, format!("descriptor has no ';' separator: '{}'", descriptor))
        })?;
        let phrase = normalize(phrase).to_lowercase();
        let info = normalize(info);

        VARIANTS
            .iter()
            .find(|(keyword, _)| phrase.contains(*keyword))
            .map(|(_, resolve)| resolve(tracklet_index, &phrase, &info))
            .unwrap_or_else(|| Err(Error::UnknownRole(phrase.clone())))
    }
}

fn malformed(tracklet_index: u32, message: String) -> Error {
    Error::MalformedConfig {
        path: format!("trackletID_{}", tracklet_index),
        message,
    }
}

/// Trim and join inner words with underscores.
fn normalize(text: &str) -> String {
    text.trim().replace(' ', "_")
}

fn team_of(phrase: &str) -> Result<Team> {
    if phrase.contains("left") {
        Ok(Team::Left)
    } else if phrase.contains("right") {
        Ok(Team::Right)
    } else {
        Err(Error::UnknownTeam(phrase.to_string()))
    }
}

/// Jersey number if `info` is a non-empty run of ASCII digits.
fn jersey_number_of(tracklet_index: u32, info: &str) -> Result<Option<u32>> {
    if info.is_empty() || !info.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    info.parse()
        .map(Some)
        .map_err(|_| malformed(tracklet_index, format!("jersey number out of range: '{}'", info)))
}

fn resolve_team_member(
    role: Role,
    tracklet_index: u32,
    phrase: &str,
    info: &str,
) -> Result<TrackletRole> {
    let team = team_of(phrase)?;
    let jersey_number = jersey_number_of(tracklet_index, info)?;
    let category = match jersey_number {
        Some(number) => format!("{}_{}_{}", role, team, number),
        None => format!("{}_{}", role, team),
    };
    Ok(TrackletRole {
        team: Some(team),
        role,
        jersey_number,
        position: None,
        category,
    })
}

fn resolve_goalkeeper(tracklet_index: u32, phrase: &str, info: &str) -> Result<TrackletRole> {
    resolve_team_member(Role::Goalkeeper, tracklet_index, phrase, info)
}

fn resolve_player(tracklet_index: u32, phrase: &str, info: &str) -> Result<TrackletRole> {
    resolve_team_member(Role::Player, tracklet_index, phrase, info)
}

fn resolve_referee(_tracklet_index: u32, _phrase: &str, info: &str) -> Result<TrackletRole> {
    Ok(TrackletRole {
        team: None,
        role: Role::Referee,
        jersey_number: None,
        position: Some(info.to_string()),
        category: format!("{}_{}", Role::Referee, info),
    })
}

fn resolve_ball(_tracklet_index: u32, _phrase: &str, info: &str) -> Result<TrackletRole> {
    Ok(untagged(Role::Ball, info))
}

fn resolve_other(_tracklet_index: u32, _phrase: &str, info: &str) -> Result<TrackletRole> {
    Ok(untagged(Role::Other, info))
}

fn untagged(role: Role, info: &str) -> TrackletRole {
    TrackletRole {
        team: None,
        role,
        jersey_number: None,
        position: None,
        category: format!("{}_{}", role, info),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_with_number() {
        let role = TrackletRole::resolve(1, "player team left; 10").unwrap();
        assert_eq!(role.role, Role::Player);
        assert_eq!(role.team, Some(Team::Left));
        assert_eq!(role.jersey_number, Some(10));
        assert_eq!(role.position, None);
        assert_eq!(role.category, "player_left_10");

        let role = TrackletRole::resolve(2, "player team right;7").unwrap();
        assert_eq!(role.category, "player_right_7");
    }

    #[test]
    fn test_goalkeeper_has_priority_over_player() {
        let role = TrackletRole::resolve(1, "goalkeeper left; 1").unwrap();
        assert_eq!(role.role, Role::Goalkeeper);
        assert_eq!(role.category, "goalkeeper_left_1");

        // "goalkeeper player" still resolves as goalkeeper
        let role = TrackletRole::resolve(1, "goalkeeper player right;12").unwrap();
        assert_eq!(role.role, Role::Goalkeeper);
    }

    #[test]
    fn test_oversized_jersey_is_an_error() {
        let err = TrackletRole::resolve(4, "player team left;99999999999").unwrap_err();
        match err {
            Error::MalformedConfig { path, .. } => assert_eq!(path, "trackletID_4"),
            other => panic!("unexpected error {:?}", other),
        }

        let role = TrackletRole::resolve(4, "player team left;007").unwrap();
        assert_eq!(role.jersey_number, Some(7));
        assert_eq!(role.category, "player_left_7");
    }

    #[test]
    fn test_non_digit_jersey_is_dropped_from_category() {
        let role = TrackletRole::resolve(3, "goalkeepers team right;X").unwrap();
        assert_eq!(role.jersey_number, None);
        assert_eq!(role.category, "goalkeeper_right");

        let role = TrackletRole::resolve(3, "player team left;").unwrap();
        assert_eq!(role.category, "player_left");
    }

    #[test]
    fn test_referee_ball_other() {
        let referee = TrackletRole::resolve(4, "referee; main").unwrap();
        assert_eq!(referee.role, Role::Referee);
        assert_eq!(referee.team, None);
        assert_eq!(referee.position.as_deref(), Some("main"));
        assert_eq!(referee.category, "referee_main");

        let ball = TrackletRole::resolve(5, "ball; ball").unwrap();
        assert_eq!(ball.role, Role::Ball);
        assert_eq!(ball.position, None);
        assert_eq!(ball.category, "ball_ball");

        let other = TrackletRole::resolve(6, "other;staff member").unwrap();
        assert_eq!(other.role, Role::Other);
        assert_eq!(other.category, "other_staff_member");
    }

    #[test]
    fn test_case_insensitive_phrase() {
        let role = TrackletRole::resolve(1, "Player Team LEFT;9").unwrap();
        assert_eq!(role.category, "player_left_9");
    }

    #[test]
    fn test_unknown_team() {
        let err = TrackletRole::resolve(1, "player; 10").unwrap_err();
        assert!(matches!(err, Error::UnknownTeam(_)));
    }

    #[test]
    fn test_unknown_role() {
        let err = TrackletRole::resolve(1, "coach;1").unwrap_err();
        assert!(matches!(err, Error::UnknownRole(_)));
    }

    #[test]
    fn test_missing_separator() {
        let err = TrackletRole::resolve(8, "referee main").unwrap_err();
        match err {
            Error::MalformedConfig { path, .. } => assert_eq!(path, "trackletID_8"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
