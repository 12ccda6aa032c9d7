//! File operation client.
//!
//! One method per file-system verb. Each method only shapes its request:
//! status handling and error wording belong to [`HttpClient`], and every
//! failure is returned as it comes back from there.

use crate::config::{ClientConfig, endpoints};
use crate::download::{Download, SaveTarget};
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{
    DirectoryListing, FilePreview, Operation, OperationAck, RelocateRequest, SaveRequest,
    SavedFile, SystemInfo, UploadAck, UploadFile, require,
};
use crate::path::RemotePath;
use crate::transport::{MultipartForm, Transport};

/// Typed facade over the file-store HTTP API.
///
/// # Example
///
/// ```ignore
/// let client = FileClient::new(ClientConfig::default(), transport);
/// let listing = client.list_directory("docs").await?;
/// for entry in listing.iter() {
///     println!("{} {}", if entry.is_dir() { 'd' } else { '-' }, entry.name);
/// }
/// ```
#[derive(Debug)]
pub struct FileClient<T> {
    http: HttpClient<T>,
}

impl<T: Transport> FileClient<T> {
    /// Create a client with an explicit configuration.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            http: HttpClient::new(config, transport),
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Server metadata.
    pub async fn system_info(&self) -> Result<SystemInfo> {
        self.http.get(endpoints::SYSTEM_INFO, &[]).await
    }

    /// List a directory. Pass `""` or [`RemotePath::root`] for the root.
    pub async fn list_directory(&self, path: impl Into<RemotePath>) -> Result<DirectoryListing> {
        let path = path.into().as_query();
        self.http.get(endpoints::LIST, &[("path", path.as_str())]).await
    }

    /// Preview a file's content.
    pub async fn preview_file(
        &self,
        path: impl Into<RemotePath>,
        filename: &str,
    ) -> Result<FilePreview> {
        require("filename", filename)?;
        let path = path.into().as_query();
        self.http
            .get(endpoints::PREVIEW, &[("path", path.as_str()), ("filename", filename)])
            .await
    }

    // =========================================================================
    // Generic operations
    // =========================================================================

    /// Create a directory `name` inside `path`.
    pub async fn create_directory(
        &self,
        path: impl Into<RemotePath>,
        name: &str,
    ) -> Result<OperationAck> {
        self.operation(Operation::CreateDirectory {
            path: path.into().as_query(),
            name: name.to_string(),
        })
        .await
    }

    /// Rename `old_name` to `new_name` inside `path`.
    pub async fn rename_item(
        &self,
        path: impl Into<RemotePath>,
        old_name: &str,
        new_name: &str,
    ) -> Result<OperationAck> {
        self.operation(Operation::Rename {
            path: path.into().as_query(),
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
        .await
    }

    /// Delete a file or directory. No confirmation.
    pub async fn delete_item(&self, path: impl Into<RemotePath>, name: &str) -> Result<OperationAck> {
        self.operation(Operation::Delete {
            path: path.into().as_query(),
            name: name.to_string(),
        })
        .await
    }

    /// Create a file with initial content (`""` for an empty file).
    pub async fn create_file(
        &self,
        path: impl Into<RemotePath>,
        name: &str,
        content: &str,
    ) -> Result<OperationAck> {
        self.operation(Operation::CreateFile {
            path: path.into().as_query(),
            name: name.to_string(),
            content: content.to_string(),
        })
        .await
    }

    /// Send an operation envelope as is.
    pub async fn operation(&self, op: Operation) -> Result<OperationAck> {
        op.validate()?;
        self.http.post_json(endpoints::OPERATION, &op).await
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Overwrite a file's content.
    pub async fn save_file(
        &self,
        path: impl Into<RemotePath>,
        filename: &str,
        content: &str,
    ) -> Result<OperationAck> {
        require("filename", filename)?;
        let body = SaveRequest {
            path: path.into().as_query(),
            filename: filename.to_string(),
            content: content.to_string(),
        };
        self.http.post_json(endpoints::SAVE, &body).await
    }

    /// Move `source_name` from `source_path` into `target_path`.
    pub async fn move_item(
        &self,
        source_path: impl Into<RemotePath>,
        source_name: &str,
        target_path: impl Into<RemotePath>,
    ) -> Result<OperationAck> {
        let body = relocate(source_path.into(), source_name, target_path.into())?;
        self.http.post_json(endpoints::MOVE, &body).await
    }

    /// Copy `source_name` from `source_path` into `target_path`.
    pub async fn copy_item(
        &self,
        source_path: impl Into<RemotePath>,
        source_name: &str,
        target_path: impl Into<RemotePath>,
    ) -> Result<OperationAck> {
        let body = relocate(source_path.into(), source_name, target_path.into())?;
        self.http.post_json(endpoints::COPY, &body).await
    }

    // =========================================================================
    // Transfer
    // =========================================================================

    /// Upload a file into `path` as a two-part multipart form.
    pub async fn upload_file(&self, path: impl Into<RemotePath>, file: UploadFile) -> Result<UploadAck> {
        require("filename", &file.filename)?;
        let form = MultipartForm::new()
            .file("file", file.filename, file.content_type, file.bytes)
            .text("path", path.into().as_query());
        self.http.post_multipart(endpoints::UPLOAD, form).await
    }

    /// Download `filename` from `path` and hand it to `target`.
    ///
    /// The saved name comes from the response's `Content-Disposition`
    /// header when present.
    pub async fn download_file<S>(
        &self,
        path: impl Into<RemotePath>,
        filename: &str,
        target: &S,
    ) -> Result<SavedFile>
    where
        S: SaveTarget + ?Sized,
    {
        let path = path.into().as_query();
        Download::new(&path, filename).run(&self.http, target).await
    }
}

fn relocate(source_path: RemotePath, source_name: &str, target_path: RemotePath) -> Result<RelocateRequest> {
    require("source_name", source_name)?;
    Ok(RelocateRequest {
        source_path: source_path.as_query(),
        source_name: source_name.to_string(),
        target_path: target_path.as_query(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use serde_json::{Value, json};

    fn client(transport: MockTransport) -> FileClient<MockTransport> {
        FileClient::new(ClientConfig::default(), transport)
    }

    fn sent_json(client: &FileClient<MockTransport>) -> Value {
        let request = client.http().transport().last_request().unwrap();
        serde_json::from_str(request.json().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_system_info() {
        let client = client(MockTransport::new().respond(200, r#"{"os": "Linux", "root_dir": "/data"}"#));
        let info = client.system_info().await.unwrap();
        assert_eq!(info.os, "Linux");
        assert_eq!(
            client.http().transport().last_request().unwrap().url,
            "/api/system-info"
        );
    }

    #[tokio::test]
    async fn test_list_root() {
        let client = client(MockTransport::new().respond(200, r#"{"items": []}"#));
        let listing = client.list_directory(RemotePath::root()).await.unwrap();
        assert!(listing.is_empty());
        assert_eq!(
            client.http().transport().last_request().unwrap().url,
            "/api/list?path="
        );
    }

    #[tokio::test]
    async fn test_list_nested_path_encoded() {
        let client = client(MockTransport::new().respond(200, r#"{"items": []}"#));
        client.list_directory("/docs/2024/").await.unwrap();
        assert_eq!(
            client.http().transport().last_request().unwrap().url,
            "/api/list?path=docs%2F2024"
        );
    }

    #[tokio::test]
    async fn test_rename_envelope() {
        let client = client(MockTransport::new().respond(200, r#"{"success": true}"#));
        client.rename_item("docs", "a.txt", "b.txt").await.unwrap();
        assert_eq!(
            sent_json(&client),
            json!({"operation": "rename", "path": "docs", "old_name": "a.txt", "new_name": "b.txt"})
        );
    }

    #[tokio::test]
    async fn test_delete_envelope() {
        let client = client(
            MockTransport::new().respond(200, r#"{"success": true, "result": {"name": "old"}}"#),
        );
        let ack = client.delete_item("docs", "old").await.unwrap();
        assert_eq!(ack.result.unwrap().name, "old");
        assert_eq!(
            sent_json(&client),
            json!({"operation": "delete", "path": "docs", "name": "old"})
        );
    }

    #[tokio::test]
    async fn test_create_file_envelope() {
        let client = client(MockTransport::new().respond(200, r#"{"success": true}"#));
        client.create_file("", "todo.md", "- [ ] ship").await.unwrap();
        assert_eq!(
            sent_json(&client),
            json!({"operation": "create_file", "path": "", "name": "todo.md", "content": "- [ ] ship"})
        );
    }

    #[tokio::test]
    async fn test_empty_name_never_sent() {
        let client = client(MockTransport::new());
        let err = client.create_directory("docs", "").await.unwrap_err();
        assert_eq!(err.message(), "name must not be empty");
        let err = client.rename_item("docs", "", "b").await.unwrap_err();
        assert_eq!(err.message(), "old_name must not be empty");
        assert!(client.http().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_preview_query() {
        let client = client(MockTransport::new().respond(200, r#"{"type": "text", "content": "hi"}"#));
        let preview = client.preview_file("docs", "a b.txt").await.unwrap();
        assert_eq!(preview.text(), Some("hi"));
        assert_eq!(
            client.http().transport().last_request().unwrap().url,
            "/api/preview?path=docs&filename=a%20b.txt"
        );
    }

    #[tokio::test]
    async fn test_save_body() {
        let client = client(MockTransport::new().respond(200, r#"{"success": true}"#));
        client.save_file("docs", "a.txt", "new content").await.unwrap();
        let request = client.http().transport().last_request().unwrap();
        assert_eq!(request.url, "/api/save");
        assert_eq!(
            sent_json(&client),
            json!({"path": "docs", "filename": "a.txt", "content": "new content"})
        );
    }

    #[tokio::test]
    async fn test_move_and_copy_bodies() {
        let client = client(
            MockTransport::new()
                .respond(200, r#"{"success": true}"#)
                .respond(200, r#"{"success": true}"#),
        );
        client.move_item("a", "x.txt", "b").await.unwrap();
        client.copy_item("/a/", "x.txt", "").await.unwrap();

        let sent = client.http().transport().requests();
        assert_eq!(sent[0].url, "/api/move");
        assert_eq!(sent[1].url, "/api/copy");
        let copy: Value = serde_json::from_str(sent[1].json().unwrap()).unwrap();
        assert_eq!(
            copy,
            json!({"source_path": "a", "source_name": "x.txt", "target_path": ""})
        );
    }

    #[tokio::test]
    async fn test_download_accepts_remote_path() {
        let client = client(MockTransport::new().respond(200, "bytes"));
        let target = crate::mock::RecordingSaveTarget::new();
        let dir = RemotePath::root().join("docs").join("2024");

        let saved = client.download_file(&dir, "q1.csv", &target).await.unwrap();

        assert_eq!(saved.filename, "q1.csv");
        assert_eq!(
            client.http().transport().last_request().unwrap().url,
            "/api/download?path=docs%2F2024&filename=q1.csv"
        );
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let client = client(MockTransport::new().respond(400, r#"{"error": "target exists"}"#));
        let err = client.move_item("a", "x.txt", "b").await.unwrap_err();
        assert_eq!(err.message(), "target exists");
    }
}
