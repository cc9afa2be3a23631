use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use actix_web::error::PayloadError;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use tokio::io::AsyncWrite;

use crate::user::http_request::{save_upload, HubError};

/// 每次写入都失败，模拟磁盘写满
struct FullDisk;

impl AsyncWrite for FullDisk {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "disk full")));
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        return Poll::Ready(Ok(()));
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        return Poll::Ready(Ok(()));
    }
}

type Body = futures::stream::Iter<std::vec::IntoIter<Result<Bytes, PayloadError>>>;

fn body(chunks: Vec<Result<Bytes, PayloadError>>) -> Body {
    return futures::stream::iter(chunks);
}

#[tokio::test]
async fn test_for_upload_written_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uploaded_ok.bin");
    let file = tokio::fs::File::create(&path).await.unwrap();

    let size = save_upload(
        &path,
        body(vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]),
        file,
    )
    .await
    .unwrap();

    assert_eq!(size, 11);
    assert_eq!(std::fs::read(&path).unwrap(), b"hello world".to_vec());
}

#[tokio::test]
async fn test_for_failed_write_removes_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uploaded_full.bin");
    std::fs::write(&path, b"partial").unwrap();

    let err = save_upload(
        &path,
        body(vec![Ok(Bytes::from_static(b"more bytes"))]),
        FullDisk,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, HubError::Io(_)));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_for_interrupted_body_removes_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uploaded_cut.bin");
    let file = tokio::fs::File::create(&path).await.unwrap();

    let err = save_upload(
        &path,
        body(vec![
            Ok(Bytes::from_static(b"first chunk")),
            Err(PayloadError::Incomplete(None)),
        ]),
        file,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, HubError::Payload(_)));
    assert!(!path.exists());
}
