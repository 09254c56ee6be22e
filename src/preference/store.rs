// region:    --- Imports
use super::model::{PreferenceDraft, SavedPreference};
use super::validate::validate;
use crate::error::MarketError;
use tokio::sync::RwLock;
use tracing::info;

// endregion: --- Imports

struct Book {
    items: Vec<SavedPreference>,
    next_seq: u64,
}

/// 선호 조건 저장소 (인메모리)
pub struct PreferenceStore {
    book: RwLock<Book>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self {
            book: RwLock::new(Book {
                items: Vec::new(),
                next_seq: 1,
            }),
        }
    }

    /// 시드 데이터로 생성. 검증에 실패한 시드는 건너뛴다.
    pub fn with_drafts(drafts: Vec<PreferenceDraft>) -> Self {
        let mut book = Book {
            items: Vec::new(),
            next_seq: 1,
        };
        for draft in drafts {
            if let Ok(preference) = validate(draft) {
                let id = format!("PREF-{}", book.next_seq);
                book.next_seq += 1;
                book.items.push(SavedPreference { id, preference });
            }
        }
        Self {
            book: RwLock::new(book),
        }
    }

    pub async fn list(&self) -> Vec<SavedPreference> {
        self.book.read().await.items.clone()
    }

    /// 선호 조건 생성
    pub async fn create(&self, draft: PreferenceDraft) -> Result<SavedPreference, MarketError> {
        let preference = validate(draft).map_err(MarketError::Validation)?;
        let mut book = self.book.write().await;
        let id = format!("PREF-{}", book.next_seq);
        book.next_seq += 1;

        let saved = SavedPreference { id, preference };
        book.items.push(saved.clone());
        info!("{:<12} --> 선호 조건 생성: {}", "Preference", saved.id);
        Ok(saved)
    }

    /// 선호 조건 수정
    pub async fn update(
        &self,
        id: &str,
        draft: PreferenceDraft,
    ) -> Result<SavedPreference, MarketError> {
        let preference = validate(draft).map_err(MarketError::Validation)?;
        let mut book = self.book.write().await;
        let saved = book
            .items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| MarketError::PreferenceNotFound(id.to_string()))?;

        saved.preference = preference;
        info!("{:<12} --> 선호 조건 수정: {}", "Preference", id);
        Ok(saved.clone())
    }

    /// 선호 조건 삭제
    pub async fn delete(&self, id: &str) -> Result<(), MarketError> {
        let mut book = self.book.write().await;
        let before = book.items.len();
        book.items.retain(|p| p.id != id);
        if book.items.len() == before {
            return Err(MarketError::PreferenceNotFound(id.to_string()));
        }
        info!("{:<12} --> 선호 조건 삭제: {}", "Preference", id);
        Ok(())
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}
