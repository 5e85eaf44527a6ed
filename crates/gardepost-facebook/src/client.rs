use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{FacebookError, Result};

/// Client for the Facebook Graph API (page photo + feed post endpoints).
#[derive(Clone)]
pub struct FacebookClient {
    client: reqwest::Client,
    graph_url: String,
}

impl FacebookClient {
    pub fn new(graph_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            graph_url,
        }
    }

    /// Upload an image to the page's photo store without publishing it.
    /// Returns the media id to attach to a feed post.
    pub async fn upload_photo(
        &self,
        page_access_token: &str,
        page_id: &str,
        image_path: &Path,
    ) -> Result<String> {
        let bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "roster.png".to_string());

        let form = Form::new()
            .text("access_token", page_access_token.to_string())
            .text("published", "false")
            .part("source", Part::bytes(bytes).file_name(file_name));

        let url = format!("{}/{}/photos", self.graph_url, page_id);
        debug!(page_id, "uploading photo");

        let resp = self.client.post(&url).multipart(form).send().await?;
        let object: ObjectResponse = check(resp).await?;
        let id = object.id.ok_or(FacebookError::MissingId)?;
        info!(page_id, media_id = %id, "photo uploaded");
        Ok(id)
    }

    /// Create a feed post with the uploaded photo attached.
    ///
    /// With `scheduled_publish_time` (epoch seconds) the post is created
    /// unpublished and the platform publishes it at that instant; without
    /// it the post goes live immediately.
    pub async fn create_post(
        &self,
        page_access_token: &str,
        page_id: &str,
        message: &str,
        media_id: &str,
        scheduled_publish_time: Option<i64>,
    ) -> Result<String> {
        let mut body = json!({
            "access_token": page_access_token,
            "message": message,
            "attached_media": json!([{ "media_fbid": media_id }]).to_string(),
        });
        if let Some(ts) = scheduled_publish_time {
            body["published"] = json!(false);
            body["scheduled_publish_time"] = json!(ts);
        }

        let url = format!("{}/{}/feed", self.graph_url, page_id);
        debug!(page_id, scheduled = scheduled_publish_time.is_some(), "creating post");

        let resp = self.client.post(&url).json(&body).send().await?;
        let object: ObjectResponse = check(resp).await?;
        let id = object.id.ok_or(FacebookError::MissingId)?;
        info!(page_id, post_id = %id, "post created");
        Ok(id)
    }

    /// Delete a post from the platform.
    pub async fn delete_post(&self, fb_post_id: &str, page_access_token: &str) -> Result<()> {
        let url = format!("{}/{}", self.graph_url, fb_post_id);
        debug!(fb_post_id, "deleting post");

        let resp = self
            .client
            .delete(&url)
            .query(&[("access_token", page_access_token)])
            .send()
            .await?;
        let _: ObjectResponse = check(resp).await?;
        info!(fb_post_id, "post deleted");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    id: Option<String>,
}

/// Convert a non-success response into an [`FacebookError::Api`], pulling
/// the platform's own error message out of the Graph error envelope when
/// present.
async fn check<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| body.clone());
    warn!(status = status.as_u16(), %message, "Facebook API error");
    Err(FacebookError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull `error.message` out of a Graph error body, if it is one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
