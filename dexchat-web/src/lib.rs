use dexchat_client::{
    api::{CommentId, Error, Limits, SortKind, TopicKey, UserVote},
    CommentStore, Coordinator, NewComment, Observer, Snapshot,
};
use wasm_bindgen::prelude::*;

mod storage;
pub use storage::BrowserStorage;

#[wasm_bindgen(start)]
pub fn start() {
    tracing_wasm::set_as_global_default();
}

fn js_error(err: Error) -> JsValue {
    match err.is_validation() {
        true => tracing::debug!(%err, "rejected comment operation"),
        false => tracing::warn!(%err, "comment operation failed"),
    }
    JsValue::from_str(&err.contents().to_string())
}

fn parse<T: std::str::FromStr<Err = Error>>(s: &str) -> Result<T, JsValue> {
    s.parse().map_err(js_error)
}

struct JsObserver {
    on_change: js_sys::Function,
    on_error: Option<js_sys::Function>,
}

impl Observer for JsObserver {
    fn on_change(&mut self, snapshot: &Snapshot) {
        let state = serde_json::json!({
            "comments": &*snapshot.comments,
            "votes": &*snapshot.votes,
        });
        if let Err(err) = self
            .on_change
            .call1(&JsValue::NULL, &JsValue::from_str(&state.to_string()))
        {
            tracing::error!(?err, "comments change callback threw");
        }
    }

    fn on_error(&mut self, err: &Error) {
        let f = match &self.on_error {
            None => return,
            Some(f) => f,
        };
        let contents = JsValue::from_str(&err.contents().to_string());
        if let Err(err) = f.call1(&JsValue::NULL, &contents) {
            tracing::error!(?err, "comments error callback threw");
        }
    }
}

/// Comments attached to one question, stored in local storage
///
/// Trees and states are handed to JavaScript as JSON strings, errors are
/// thrown as JSON strings with a `type` and a `message`.
#[wasm_bindgen]
pub struct CommentsPanel {
    coordinator: Coordinator<BrowserStorage>,
}

#[wasm_bindgen]
impl CommentsPanel {
    #[wasm_bindgen(constructor)]
    pub fn new(question: &str) -> CommentsPanel {
        let topic = TopicKey::from_question(question);
        tracing::debug!(%topic, "opening comments panel");
        CommentsPanel {
            coordinator: Coordinator::new(
                CommentStore::new(BrowserStorage),
                topic,
                Limits::default(),
            ),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn topic(&self) -> String {
        self.coordinator.topic().to_string()
    }

    pub fn subscribe(&mut self, on_change: js_sys::Function, on_error: Option<js_sys::Function>) {
        self.coordinator
            .subscribe(Box::new(JsObserver { on_change, on_error }));
    }

    pub fn refresh(&mut self) {
        self.coordinator.refresh()
    }

    /// Returns the id of the new comment
    pub fn create(
        &mut self,
        content: String,
        author: Option<String>,
        parent_id: Option<String>,
    ) -> Result<String, JsValue> {
        let new = NewComment {
            content,
            author,
            parent_id: parent_id.map(CommentId),
        };
        self.coordinator
            .create(new)
            .map(|id| id.0)
            .map_err(js_error)
    }

    pub fn edit(&mut self, id: &str, content: &str, author: Option<String>) -> Result<(), JsValue> {
        self.coordinator
            .edit(&CommentId::from(id), content, author.as_deref())
            .map_err(js_error)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), JsValue> {
        self.coordinator
            .delete(&CommentId::from(id))
            .map_err(js_error)
    }

    /// `target` is "up" or "down"; returns the resulting vote, if any
    pub fn vote(&mut self, id: &str, target: &str) -> Result<Option<String>, JsValue> {
        let target: UserVote = parse(target)?;
        self.coordinator
            .vote(&CommentId::from(id), target)
            .map(|v| v.map(|v| v.to_string()))
            .map_err(js_error)
    }

    /// Uses the stored preference if no sort is given
    pub fn tree(&self, sort: Option<String>) -> Result<String, JsValue> {
        let kind = match sort {
            Some(s) => parse(&s)?,
            None => self.coordinator.sort_preference(),
        };
        serde_json::to_string(&self.coordinator.tree(kind))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn sort(&self) -> String {
        self.coordinator.sort_preference().to_string()
    }

    #[wasm_bindgen(js_name = setSort)]
    pub fn set_sort(&mut self, sort: &str) -> Result<(), JsValue> {
        let kind: SortKind = parse(sort)?;
        self.coordinator
            .set_sort_preference(kind)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = suggestedAuthor)]
    pub fn suggested_author(&self) -> String {
        self.coordinator.suggested_author()
    }

    #[wasm_bindgen(getter, js_name = maxContentLength)]
    pub fn max_content_length(&self) -> usize {
        self.coordinator.limits().max_content_len
    }
}
