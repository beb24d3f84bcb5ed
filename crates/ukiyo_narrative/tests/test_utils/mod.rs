//! Test utilities for pipeline tests.
//!
//! Scripted completers answer in call order and record what they were asked.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use ukiyo_core::{Completion, NewStory, ProviderId, StoryFields, StoryRecord, StorySummary};
use ukiyo_error::{
    DatabaseError, DatabaseErrorKind, GatewayError, GatewayErrorKind, ProviderError,
    ProviderErrorKind, UkiyoResult,
};
use ukiyo_interface::{ImageCompleter, StoryRepository, TextCompleter};
use ukiyo_narrative::InMemoryStoryRepository;

/// Story with two pages: page 1 has two blocks, page 2 has one.
pub const TWO_PAGE_STORY: &str = "Вступление к истории.\n\n\
Страница 1, Блок 1\nЛиса идёт по мосту.\n\n\
Страница 1, Блок 2\nФонари гаснут.\n\n\
Страница 2, Блок 1\nЛиса встречает старика.";

/// Story whose only page is odd.
pub const ONE_PAGE_STORY: &str = "Страница 1, Блок 1\nТишина над рекой.";

/// Dialogue reply for [`TWO_PAGE_STORY`], plus a span for a block that does not exist.
pub const DIALOGUE_REPLY: &str = "<start_p2_b1>— Кто ты?<end_p2_b1>\n\
<start_p9_b9>— Лишняя реплика<end_p9_b9>";

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
    /// Never resolves
    Hang,
}

pub fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

fn exhausted() -> GatewayError {
    GatewayError::new(GatewayErrorKind::Exhausted {
        provider: "Novita AI".to_string(),
        attempted: 2,
        last: Box::new(ProviderError::new(ProviderErrorKind::Api {
            status: 503,
            message: "overloaded".to_string(),
        })),
    })
}

/// A call made to a completer.
#[derive(Debug, Clone)]
pub struct Call {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Text completer replaying a script; runs out into failures.
#[derive(Clone, Default)]
pub struct ScriptedCompleter {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedCompleter {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompleter for ScriptedCompleter {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> UkiyoResult<Completion> {
        self.calls.lock().unwrap().push(Call {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Fail);
        match reply {
            Reply::Text(text) => Ok(Completion {
                text,
                provider: ProviderId::Gemini,
                model: "gemini-test".to_string(),
            }),
            Reply::Fail => Err(exhausted().into()),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Repository that can be told to fail inserts or updates.
#[derive(Clone, Default)]
pub struct FlakyRepository {
    inner: InMemoryStoryRepository,
    fail_insert: bool,
    fail_update: bool,
}

impl FlakyRepository {
    pub fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    pub fn failing_update() -> Self {
        Self {
            fail_update: true,
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &InMemoryStoryRepository {
        &self.inner
    }
}

#[async_trait]
impl StoryRepository for FlakyRepository {
    async fn insert(&self, story: &NewStory) -> UkiyoResult<i32> {
        if self.fail_insert {
            return Err(DatabaseError::new(DatabaseErrorKind::Connection("refused".into())).into());
        }
        self.inner.insert(story).await
    }

    async fn update(&self, id: i32, fields: &StoryFields) -> UkiyoResult<()> {
        if self.fail_update {
            return Err(DatabaseError::new(DatabaseErrorKind::Query("deadlock".into())).into());
        }
        self.inner.update(id, fields).await
    }

    async fn get_by_id(&self, id: i32) -> UkiyoResult<StoryRecord> {
        self.inner.get_by_id(id).await
    }

    async fn list_recent(&self, limit: usize) -> UkiyoResult<Vec<StorySummary>> {
        self.inner.list_recent(limit).await
    }
}

/// Image completer returning a fixed data URI, failing on chosen scenes.
#[derive(Clone, Default)]
pub struct MockImages {
    fail_on: Arc<Mutex<Vec<String>>>,
    scenes: Arc<Mutex<Vec<String>>>,
}

impl MockImages {
    pub fn failing_on(scene: &str) -> Self {
        let images = Self::default();
        images.fail_on.lock().unwrap().push(scene.to_string());
        images
    }

    pub fn heal(&self) {
        self.fail_on.lock().unwrap().clear();
    }

    pub fn scenes(&self) -> Vec<String> {
        self.scenes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageCompleter for MockImages {
    async fn complete_image(&self, scene_description: &str) -> UkiyoResult<String> {
        self.scenes.lock().unwrap().push(scene_description.to_string());
        if self.fail_on.lock().unwrap().iter().any(|s| s == scene_description) {
            return Err(exhausted().into());
        }
        Ok("data:image/png;base64,iVBORw0KGgo=".to_string())
    }
}
