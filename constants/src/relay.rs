use serde::{Deserialize, Serialize};

/// Default TCP port the relay listener binds on.
pub const RELAY_PORT: u16 = 8000;

/// One newline-delimited JSON message on the relay channel.
///
/// `image` carries a base64-encoded image file; `lines` carries vertex
/// triples in normalized [0,1] cube coordinates, each consecutive group of
/// three vertices forming one closed loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayMessage {
    Image { data: String },
    Lines { data: Vec<[f32; 3]> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_message_round_trip() {
        let json = r#"{"type":"image","data":"aGVsbG8="}"#;
        let msg: RelayMessage = serde_json::from_str(json).unwrap();
        match &msg {
            RelayMessage::Image { data } => assert_eq!(data, "aGVsbG8="),
            other => panic!("unexpected message: {other:?}"),
        }
        let back = serde_json::to_string(&msg).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn lines_message_parses_triples() {
        let json = r#"{"type":"lines","data":[[0.0,0.0,0.0],[1.0,0.0,0.5],[0.5,1.0,0.25]]}"#;
        let msg: RelayMessage = serde_json::from_str(json).unwrap();
        match msg {
            RelayMessage::Lines { data } => {
                assert_eq!(data.len(), 3);
                assert_eq!(data[1], [1.0, 0.0, 0.5]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"type":"particles","data":[]}"#;
        assert!(serde_json::from_str::<RelayMessage>(json).is_err());
    }
}
