use serde_json::Value;
use tracing::warn;

use crate::http::PulseError;
use crate::models::rooms::{GetRoomsResponse, GetRoomsResponseItem, GetRoomsResponseObject};

pub type Rooms = Vec<Room>;

const UNKNOWN_ROOM_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
}

impl Room {
    pub fn new(id: &str, name: &str) -> Room {
        Room {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Builds a room from one entry of the rooms listing. Returns `None` when
    /// the entry carries no usable id.
    pub fn from_item(item: GetRoomsResponseItem) -> Option<Room> {
        match item {
            GetRoomsResponseItem::Id(id) => {
                if id.trim().is_empty() {
                    return None;
                }
                let name = format!("Room {}", id);
                Some(Room { id, name })
            }
            GetRoomsResponseItem::Object(object) => Room::from_object(object),
        }
    }

    fn from_object(object: GetRoomsResponseObject) -> Option<Room> {
        let id = text_from_value(object.id).or_else(|| text_from_value(object.room_id))?;
        // names are only display text, a numeric name is still a name
        let name = text_from_value(object.name)
            .or_else(|| text_from_value(object.room_name))
            .unwrap_or(UNKNOWN_ROOM_NAME.to_string());

        Some(Room { id, name })
    }
}

fn text_from_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Converts a decoded rooms listing into rooms, keeping the order the api
/// returned them in. Entries without an id are skipped.
pub fn rooms_from_response(response: GetRoomsResponse) -> Result<Rooms, PulseError> {
    let items = response.into_items().ok_or_else(|| {
        PulseError::Malformed("no rooms, data or items list in rooms response".to_string())
    })?;

    let mut rooms = Vec::with_capacity(items.len());
    for (index, value) in items.into_iter().enumerate() {
        let room = serde_json::from_value::<GetRoomsResponseItem>(value.clone())
            .ok()
            .and_then(Room::from_item);

        match room {
            Some(room) => rooms.push(room),
            None => warn!(index, entry = %value, "skipping room entry without an id"),
        }
    }

    return Ok(rooms);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Rooms, PulseError> {
        let response: GetRoomsResponse = serde_json::from_str(body).unwrap();
        rooms_from_response(response)
    }

    #[test]
    fn test_rooms_nested_under_rooms_key() {
        let rooms = parse(
            r#"{"rooms": [
                {"id": "room-123", "name": "Conference Room A"},
                {"id": "room-124", "name": "Conference Room B"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            rooms,
            vec![
                Room::new("room-123", "Conference Room A"),
                Room::new("room-124", "Conference Room B"),
            ]
        );
    }

    #[test]
    fn test_rooms_alternative_shapes() {
        let bare = parse(r#"[{"id": "a", "name": "A"}]"#).unwrap();
        assert_eq!(bare, vec![Room::new("a", "A")]);

        let data = parse(r#"{"data": [{"roomId": "b", "roomName": "B"}]}"#).unwrap();
        assert_eq!(data, vec![Room::new("b", "B")]);

        let items = parse(r#"{"items": ["c"]}"#).unwrap();
        assert_eq!(items, vec![Room::new("c", "Room c")]);
    }

    #[test]
    fn test_rooms_without_id_are_skipped() {
        let rooms = parse(
            r#"{"rooms": [
                {"name": "No Id"},
                42,
                {"id": 7},
                {"id": "", "roomId": "z", "name": ""}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            rooms,
            vec![Room::new("7", "Unknown"), Room::new("z", "Unknown")]
        );
    }

    #[test]
    fn test_room_with_non_string_name_is_kept() {
        let rooms = parse(
            r#"{"rooms": [
                {"id": "r1", "name": 101},
                {"id": "r2", "name": "B"},
                {"id": "r3", "name": null, "roomName": 7},
                {"id": "r4", "name": {"en": "Lobby"}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            rooms,
            vec![
                Room::new("r1", "101"),
                Room::new("r2", "B"),
                Room::new("r3", "7"),
                Room::new("r4", "Unknown"),
            ]
        );
    }

    #[test]
    fn test_object_without_room_list_is_malformed() {
        let err = parse(r#"{"message": "hello"}"#).unwrap_err();
        assert!(matches!(err, PulseError::Malformed(_)));
    }

    #[test]
    fn test_empty_room_list() {
        assert!(parse(r#"{"rooms": []}"#).unwrap().is_empty());
    }
}
