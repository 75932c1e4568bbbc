use serde::{Deserialize, Serialize};

/// A single quote as it appears on a listing page.
///
/// Every field is kept as the raw text found in the markup, `likes` and `date` included.
/// Field order is the key order of the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub text: String,
    pub id: String,
    pub likes: String,
    pub date: String,
}
