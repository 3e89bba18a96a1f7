use serde::{
    Serialize,
    Deserialize
};

/// The `name` key every registry entry carries.
#[derive(Clone, Serialize, Deserialize)]
pub struct NamedJsonObject {
    name: String
}


impl NamedJsonObject {
    pub fn new(name: String) -> NamedJsonObject {
        NamedJsonObject { name }
    }

    pub fn name(&self) -> &String {
        &self.name
    }
}
