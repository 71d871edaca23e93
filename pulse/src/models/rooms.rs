use serde::{Deserialize, Serialize};
use serde_json::Value;

// the rooms endpoint has been seen returning a bare list as well as the list
// nested under a few different keys
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GetRoomsResponse {
    List(Vec<Value>),
    Nested(GetRoomsResponseNested),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetRoomsResponseNested {
    pub rooms: Option<Vec<Value>>,
    pub data: Option<Vec<Value>>,
    pub items: Option<Vec<Value>>,
}

impl GetRoomsResponse {
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self {
            GetRoomsResponse::List(items) => Some(items),
            GetRoomsResponse::Nested(nested) => nested.rooms.or(nested.data).or(nested.items),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GetRoomsResponseItem {
    Id(String),
    Object(GetRoomsResponseObject),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetRoomsResponseObject {
    pub id: Option<Value>,
    #[serde(rename = "roomId")]
    pub room_id: Option<Value>,
    pub name: Option<Value>,
    #[serde(rename = "roomName")]
    pub room_name: Option<Value>,
}
