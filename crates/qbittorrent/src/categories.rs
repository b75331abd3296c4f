use reqwest::Response;

use crate::client::QBittorrentClient;
use crate::models::JsonMap;
use crate::params::Params;
use crate::target::Target;

impl QBittorrentClient {
    /// Set category of torrent(s); an empty category removes it
    /// POST /api/v2/torrents/setCategory
    pub async fn set_category(
        &self,
        target: impl Into<Target>,
        category: &str,
    ) -> crate::Result<Response> {
        let params = target
            .into()
            .into_params("hashes")
            .with("category", category);
        self.post("torrents/setCategory", &params).await
    }

    /// Get all categories, keyed by name
    /// POST /api/v2/torrents/categories
    ///
    /// Each value is an object with at least `name` and `savePath`.
    pub async fn categories(&self) -> crate::Result<JsonMap> {
        self.post_json("torrents/categories", &Params::new()).await
    }

    /// Create a category
    /// POST /api/v2/torrents/createCategory
    pub async fn create_category(
        &self,
        category: &str,
        save_path: &str,
    ) -> crate::Result<Response> {
        let params = Params::new()
            .with("category", category)
            .with("savePath", save_path);
        self.post("torrents/createCategory", &params).await
    }

    /// Change the save path of a category
    /// POST /api/v2/torrents/editCategory
    pub async fn edit_category(&self, category: &str, save_path: &str) -> crate::Result<Response> {
        let params = Params::new()
            .with("category", category)
            .with("savePath", save_path);
        self.post("torrents/editCategory", &params).await
    }

    /// Remove categories
    /// POST /api/v2/torrents/removeCategories
    pub async fn remove_categories(&self, categories: &[&str]) -> crate::Result<Response> {
        let params = Params::new().with("categories", categories.join("\n"));
        self.post("torrents/removeCategories", &params).await
    }

    /// Add tags to torrent(s)
    /// POST /api/v2/torrents/addTags
    ///
    /// # Arguments
    /// * `target` - One hash, a list of hashes, or [`Target::All`]
    /// * `tags` - Tags to add
    pub async fn add_tags(
        &self,
        target: impl Into<Target>,
        tags: &[&str],
    ) -> crate::Result<Response> {
        let params = target
            .into()
            .into_params("hashes")
            .with("tags", tags.join(","));
        self.post("torrents/addTags", &params).await
    }

    /// Remove tags from torrent(s)
    /// POST /api/v2/torrents/removeTags
    ///
    /// # Arguments
    /// * `target` - One hash, a list of hashes, or [`Target::All`]
    /// * `tags` - Tags to remove. If empty, all tags are removed.
    pub async fn remove_tags(
        &self,
        target: impl Into<Target>,
        tags: &[&str],
    ) -> crate::Result<Response> {
        let params = target
            .into()
            .into_params("hashes")
            .with("tags", tags.join(","));
        self.post("torrents/removeTags", &params).await
    }

    /// Get all tags
    /// POST /api/v2/torrents/tags
    pub async fn tags(&self) -> crate::Result<Vec<String>> {
        self.post_json("torrents/tags", &Params::new()).await
    }

    /// Create tags
    /// POST /api/v2/torrents/createTags
    pub async fn create_tags(&self, tags: &[&str]) -> crate::Result<Response> {
        let params = Params::new().with("tags", tags.join(","));
        self.post("torrents/createTags", &params).await
    }

    /// Delete tags
    /// POST /api/v2/torrents/deleteTags
    pub async fn delete_tags(&self, tags: &[&str]) -> crate::Result<Response> {
        let params = Params::new().with("tags", tags.join(","));
        self.post("torrents/deleteTags", &params).await
    }
}
