use std::sync::{Arc, Mutex};

use super::dom::Dom;

pub type SharedDom = Arc<Mutex<Dom>>;
