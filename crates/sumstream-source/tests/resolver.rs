use std::io::Write;
use std::sync::Arc;

use sumstream_source::{
    MockHttpClient, MockResource, Resolver, Source, SourceError, SourceResolver, Subject,
};
use tokio::runtime::Runtime;

fn read_all(mut source: Box<dyn Source>) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = source.read(3) {
        out.extend_from_slice(&chunk);
    }
    source.close();
    out
}

fn resolver(rt: &Runtime) -> SourceResolver<MockHttpClient> {
    let client = MockHttpClient::new()
        .with_resource("http://example.com/a", MockResource::new("remote bytes"));
    SourceResolver::new(Arc::new(client), rt.handle().clone())
}

#[test]
fn test_resolves_memory_subjects() {
    let rt = Runtime::new().unwrap();
    let resolver = resolver(&rt);

    let text = resolver.resolve(&Subject::from("héllo")).unwrap();
    assert_eq!(text.size(), Some(6));
    assert_eq!(read_all(text), "héllo".as_bytes());

    let bytes = resolver.resolve(&Subject::from(vec![1u8, 2, 3, 4])).unwrap();
    assert_eq!(read_all(bytes), vec![1, 2, 3, 4]);
}

#[test]
fn test_resolves_file_url() {
    let rt = Runtime::new().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"on disk").unwrap();
    file.flush().unwrap();

    let subject = Subject::from_path(file.path()).unwrap();
    let source = resolver(&rt).resolve(&subject).unwrap();
    assert_eq!(read_all(source), b"on disk");
}

#[test]
fn test_missing_file_is_io_error() {
    let rt = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let subject = Subject::from_path(dir.path().join("missing")).unwrap();
    assert!(matches!(resolver(&rt).resolve(&subject), Err(SourceError::Io(_))));
}

#[test]
fn test_resolves_http_url() {
    let rt = Runtime::new().unwrap();
    let subject = Subject::parse_url("http://example.com/a").unwrap();
    let source = resolver(&rt).resolve(&subject).unwrap();
    assert_eq!(source.size(), Some(12));
    assert_eq!(read_all(source), b"remote bytes");
}

#[test]
fn test_unsupported_scheme() {
    let rt = Runtime::new().unwrap();
    let subject = Subject::parse_url("ftp://example.com/a").unwrap();
    assert!(matches!(
        resolver(&rt).resolve(&subject),
        Err(SourceError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}
