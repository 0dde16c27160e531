use crate::game::types::{ClientId, GameOverNotice, GameSnapshot, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinRoom(String),
    LeaveRoom,
    StartButtonClick,
    DirectionalInput(Point),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { id: ClientId },
    JoinRoomCallback(bool),
    LeaveRoomCallback,
    StartButtonClickCallback(bool),
    ListOfReadyPlayersChanged(Vec<ClientId>),
    StartGame,
    GameData(GameSnapshot),
    GameOver(GameOverNotice),
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
    serde_json::from_str(text).ok()
}

pub fn encode_server_message(message: &ServerMessage) -> serde_json::Result<String> {
    serde_json::to_string(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{RoundCause, SnakeSnapshot};
    use serde_json::json;

    #[test]
    fn decode_join_room_with_name() {
        let message = decode_client_message(r#"{"type":"join_room","data":"lobby"}"#);
        assert_eq!(message, Some(ClientMessage::JoinRoom("lobby".to_string())));
    }

    #[test]
    fn decode_payloadless_messages() {
        assert_eq!(
            decode_client_message(r#"{"type":"leave_room"}"#),
            Some(ClientMessage::LeaveRoom)
        );
        assert_eq!(
            decode_client_message(r#"{"type":"start_button_click"}"#),
            Some(ClientMessage::StartButtonClick)
        );
    }

    #[test]
    fn decode_directional_input() {
        let message = decode_client_message(r#"{"type":"directional_input","data":{"x":0,"y":-1}}"#);
        assert_eq!(
            message,
            Some(ClientMessage::DirectionalInput(Point { x: 0, y: -1 }))
        );
    }

    #[test]
    fn malformed_frames_are_dropped() {
        assert!(decode_client_message("not json").is_none());
        assert!(decode_client_message(r#"{"type":"teleport"}"#).is_none());
        assert!(decode_client_message(r#"{"type":"join_room","data":7}"#).is_none());
        assert!(decode_client_message(r#"{"type":"directional_input","data":{"x":0.5,"y":0}}"#).is_none());
    }

    #[test]
    fn game_data_uses_client_field_names() {
        let message = ServerMessage::GameData(GameSnapshot {
            snakes: vec![SnakeSnapshot {
                owner: "a".to_string(),
                body: vec![Point { x: 1, y: 2 }],
                past_body: vec![Point { x: 0, y: 2 }],
                corners_for_correction: Vec::new(),
                points: 4,
            }],
            apples: vec![Point { x: 9, y: 9 }],
        });
        let value: serde_json::Value =
            serde_json::from_str(&encode_server_message(&message).expect("encode")).expect("json");
        assert_eq!(
            value,
            json!({
                "type": "game_data",
                "data": {
                    "snakes": [{
                        "owner": "a",
                        "body": [{"x": 1, "y": 2}],
                        "pastBody": [{"x": 0, "y": 2}],
                        "cornersForCorrection": [],
                        "points": 4
                    }],
                    "apples": [{"x": 9, "y": 9}]
                }
            })
        );
    }

    #[test]
    fn game_over_causes_encode_as_strings() {
        let draw = ServerMessage::GameOver(GameOverNotice {
            cause: RoundCause::Draw,
            owners_of_snakes_to_bump: vec!["a".to_string(), "b".to_string()],
        });
        let value: serde_json::Value =
            serde_json::from_str(&encode_server_message(&draw).expect("encode")).expect("json");
        assert_eq!(
            value,
            json!({
                "type": "game_over",
                "data": {"cause": "draw", "ownersOfSnakesToBump": ["a", "b"]}
            })
        );

        let quit = encode_server_message(&ServerMessage::GameOver(GameOverNotice::quit()))
            .expect("encode");
        assert!(quit.contains(r#""cause":"""#));
    }

    #[test]
    fn payloadless_replies_omit_data() {
        let text = encode_server_message(&ServerMessage::LeaveRoomCallback).expect("encode");
        assert_eq!(text, r#"{"type":"leave_room_callback"}"#);
        let text = encode_server_message(&ServerMessage::JoinRoomCallback(true)).expect("encode");
        assert_eq!(text, r#"{"type":"join_room_callback","data":true}"#);
    }
}
