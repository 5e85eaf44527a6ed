use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use gardepost_core::types::{OperatorContext, Post, Pharmacy, PostStatus};
use gardepost_store::{MessageStore, PharmacyStore, PostStore};

use crate::collaborators::Platform;
use crate::error::{PublishError, Result};
use crate::types::PostView;

/// Owns every state transition of a recorded post after its creation.
///
/// `published` and `cancelled` are terminal; `archived` is never a stored
/// state, only a read-time view over {status, scheduled_at, now}.
pub struct LifecycleController {
    pharmacies: Arc<PharmacyStore>,
    posts: Arc<PostStore>,
    messages: Arc<MessageStore>,
    platform: Arc<dyn Platform>,
}

impl LifecycleController {
    pub fn new(
        pharmacies: Arc<PharmacyStore>,
        posts: Arc<PostStore>,
        messages: Arc<MessageStore>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            pharmacies,
            posts,
            messages,
            platform,
        }
    }

    /// Publish a scheduled post immediately, regardless of its slot time.
    ///
    /// The stored image is re-uploaded and a fresh unscheduled post is
    /// created; on success the record transitions to `published`. Returns
    /// the new remote post id.
    pub async fn force_publish(&self, post_id: &str, ctx: &OperatorContext) -> Result<String> {
        let post = self.load_post(post_id)?;
        self.require_scheduled(&post, "published")?;
        let pharmacy = self.load_pharmacy(&post.pharmacy_id)?;
        let page_id = pharmacy
            .facebook_page_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PublishError::Validation("missing Facebook page id".into()))?;

        let image = Path::new(&post.image_path);
        if !image.exists() {
            return Err(PublishError::MissingImage {
                path: post.image_path.clone(),
            });
        }
        let message = self.messages.get()?.ok_or(PublishError::MissingMessage)?;

        info!(operator = %ctx, post_id, pharmacy = %pharmacy.name, "force-publishing");
        let media_id = self
            .platform
            .upload_photo(&pharmacy.page_access_token, page_id, image)
            .await?;
        let fb_post_id = self
            .platform
            .create_post(&pharmacy.page_access_token, page_id, &message, &media_id, None)
            .await?;

        self.posts.set_status(post_id, PostStatus::Published)?;
        info!(post_id, %fb_post_id, "post published");
        Ok(fb_post_id)
    }

    /// Cancel a scheduled post.
    ///
    /// When a remote post exists it is deleted first; a remote delete
    /// failure aborts the cancellation and the local state stays
    /// `scheduled`.
    pub async fn cancel(&self, post_id: &str, ctx: &OperatorContext) -> Result<()> {
        let post = self.load_post(post_id)?;
        self.require_scheduled(&post, "cancelled")?;

        if let Some(fb_post_id) = &post.fb_post_id {
            let pharmacy = self.load_pharmacy(&post.pharmacy_id)?;
            self.platform
                .delete_post(fb_post_id, &pharmacy.page_access_token)
                .await?;
            info!(post_id, %fb_post_id, "remote post deleted");
        }

        self.posts.set_status(post_id, PostStatus::Cancelled)?;
        info!(operator = %ctx, post_id, "post cancelled");
        Ok(())
    }

    /// Wipe every local post record. Remote posts are left untouched.
    pub fn delete_all(&self, ctx: &OperatorContext) -> Result<usize> {
        let count = self.posts.delete_all()?;
        info!(operator = %ctx, count, "all posts deleted");
        Ok(count)
    }

    /// Every post with its pharmacy name and derived display status,
    /// earliest slot first.
    pub fn list(&self, now: DateTime<Utc>) -> Result<Vec<PostView>> {
        let listings = self.posts.list_with_pharmacy()?;
        Ok(listings
            .into_iter()
            .map(|listing| PostView {
                status: listing.post.display_status(now),
                id: listing.post.id,
                pharmacy_name: listing.pharmacy_name,
                image_path: listing.post.image_path,
                scheduled_at: listing.post.scheduled_at,
                fb_post_id: listing.post.fb_post_id,
            })
            .collect())
    }

    fn load_post(&self, post_id: &str) -> Result<Post> {
        self.posts
            .get(post_id)?
            .ok_or_else(|| PublishError::PostNotFound {
                id: post_id.to_string(),
            })
    }

    fn load_pharmacy(&self, pharmacy_id: &str) -> Result<Pharmacy> {
        self.pharmacies
            .get(pharmacy_id)?
            .ok_or_else(|| PublishError::PharmacyNotFound {
                id: pharmacy_id.to_string(),
            })
    }

    fn require_scheduled(&self, post: &Post, action: &'static str) -> Result<()> {
        if post.status != PostStatus::Scheduled {
            return Err(PublishError::InvalidState {
                from: post.status,
                action,
            });
        }
        Ok(())
    }
}
