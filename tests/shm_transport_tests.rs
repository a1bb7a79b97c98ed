#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use seabattle::protocol::GameApi;
use seabattle::transport::shm::{
    Role, ShmTransport, REPLY_TOO_LARGE, SEGMENT_SIZE, SLOT_CAPACITY,
};
use seabattle::transport::Transport;
use seabattle::{Dispatcher, GameClient, Message, MessageKind, Server, ServerConfig, Skeleton, Stub};
use tokio::sync::Mutex;

#[test]
fn test_open_without_server_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = ShmTransport::open(dir.path().join("missing")).err().unwrap();
    assert!(err.to_string().contains("is the server running?"));
}

#[test]
fn test_open_rejects_foreign_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk");
    std::fs::write(&path, vec![0u8; SEGMENT_SIZE]).unwrap();
    assert!(ShmTransport::open(&path).is_err());
    std::fs::write(&path, b"short").unwrap();
    assert!(ShmTransport::open(&path).is_err());
}

#[test]
fn test_server_removes_segment_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segment");
    let server = ShmTransport::create(&path).unwrap();
    assert_eq!(server.role(), Role::Server);
    let client = ShmTransport::open(&path).unwrap();
    assert_eq!(client.role(), Role::Client);
    drop(client);
    assert!(path.exists());
    drop(server);
    assert!(!path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_cannot_pipeline_requests() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("segment");
    let _server = ShmTransport::create(&path)?;
    let mut client = ShmTransport::open(&path)?;
    assert!(client.recv().await.is_err());
    client.send(Message::login("alice")).await?;
    let err = client.send(Message::login("bob")).await.unwrap_err();
    assert_eq!(err.to_string(), "a request is already in flight");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rendezvous_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("segment");
    let server_end = ShmTransport::create(&path)?.with_tick(Duration::from_micros(200));
    let client_end = ShmTransport::open(&path)?.with_tick(Duration::from_micros(200));

    let dispatcher = Arc::new(Mutex::new(Dispatcher::default()));
    let serve = tokio::spawn(async move {
        let mut skeleton = Skeleton::new(dispatcher, server_end);
        skeleton.run().await
    });

    let mut client = GameClient::new(Stub::new(client_end), "alice");
    let login = client.login().await?;
    assert_eq!(login.text, "Registration successful!");
    assert!(client.create_match("g1").await?.ok);
    let status = client.game_status("g1").await?;
    assert_eq!(status.text, "Waiting for an opponent to join");
    let stats = client.stats().await?;
    assert!(stats.text.starts_with("Statistics for alice:"));

    // a request far above the text cap still fits the slot
    let mut stub = client.into_inner();
    let mut big = Message::login("x");
    big.text = "y".repeat(8000);
    let reply = stub.call(big).await?;
    assert_eq!(reply.kind, MessageKind::LoginResponse);

    serve.abort();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_serves_until_shutdown_and_saves() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ServerConfig {
        segment: dir.path().join("segment"),
        stats_file: dir.path().join("stats.dat"),
        ..ServerConfig::default()
    };
    let server = Server::new(config.clone());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let client = async {
        // wait for the server to publish the segment
        let transport = loop {
            match ShmTransport::open(&config.segment) {
                Ok(t) => break t,
                Err(_) => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        };
        let mut client = GameClient::new(Stub::new(transport), "alice");
        let login = client.login().await?;
        let _ = stop_tx.send(());
        Ok::<_, anyhow::Error>(login)
    };
    let serve = server.serve_shared_memory(async {
        let _ = stop_rx.await;
    });
    let (login, served) = tokio::join!(client, serve);
    assert!(login?.ok);
    served?;

    assert!(!config.segment.exists());
    let players = seabattle::stats_store::load(&config.stats_file, 10)?;
    assert!(players.get("alice").is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reply_too_large_for_slot_becomes_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("segment");
    let mut server_end = ShmTransport::create(&path)?.with_tick(Duration::from_micros(200));
    let mut client_end = ShmTransport::open(&path)?.with_tick(Duration::from_micros(200));

    client_end.send(Message::login("alice")).await?;
    let request = server_end.recv().await?;
    let mut reply = request.into_reply(MessageKind::LoginResponse);
    reply.opponent = "o".repeat(SLOT_CAPACITY);
    server_end.send(reply).await?;

    let answer = tokio::time::timeout(Duration::from_secs(5), client_end.recv()).await??;
    assert_eq!(answer.kind, MessageKind::Error);
    assert_eq!(answer.text, REPLY_TOO_LARGE);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slot_sized_request_keeps_server_alive() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = ServerConfig {
        segment: dir.path().join("segment"),
        stats_file: dir.path().join("stats.dat"),
        ..ServerConfig::default()
    };
    let server = Server::new(config.clone());
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let client = async {
        let transport = loop {
            match ShmTransport::open(&config.segment) {
                Ok(t) => break t,
                Err(_) => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        };
        let mut client = GameClient::new(Stub::new(transport), "alice");
        assert!(client.login().await?.ok);

        // a username that fills the request slot almost to the last byte
        let base = Message::game_status("", "g1").encode()?.len();
        let huge = Message::game_status(&"u".repeat(SLOT_CAPACITY - 2 - base), "g1");
        assert_eq!(huge.encode()?.len(), SLOT_CAPACITY - 2);
        let mut stub = client.into_inner();
        let reply = tokio::time::timeout(Duration::from_secs(5), stub.call(huge)).await??;
        assert_eq!(reply.kind, MessageKind::GameStatus);
        assert!(!reply.ok);
        assert!(reply.username.is_empty());

        let mut client = GameClient::new(stub, "alice");
        let stats = client.stats().await?;
        let _ = stop_tx.send(());
        Ok::<_, anyhow::Error>(stats)
    };
    let serve = server.serve_shared_memory(async {
        let _ = stop_rx.await;
    });
    let (stats, served) = tokio::join!(client, serve);
    assert!(stats?.text.starts_with("Statistics for alice:"));
    served?;

    let players = seabattle::stats_store::load(&config.stats_file, 10)?;
    assert!(players.get("alice").is_some());
    Ok(())
}
