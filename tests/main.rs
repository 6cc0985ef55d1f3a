#![allow(missing_docs)]

pub mod common;

use common::{FtpClient, declare_data_endpoint, login, receive_data, send_data, spawn_server};
use portside::Server;
use portside::auth::CsvFileAuthenticator;
use std::sync::Arc;

// Each test gets its own server instance and port; see common::spawn_server.

#[tokio::test]
async fn auth_happy_path_and_quit() {
    let _root = spawn_server(2151).await;
    let mut client = FtpClient::connect(2151).await;

    assert_eq!(client.read_reply().await, "220 Service ready for new user.\r\n");
    client.send("USER alice\r\n").await;
    assert_eq!(client.read_reply().await, "331 Username OK, need password.\r\n");
    client.send("PASS wonderland\r\n").await;
    assert_eq!(client.read_reply().await, "230 User logged in, proceed.\r\n");

    client.send("QUIT\r\n").await;
    assert_eq!(client.read_reply().await, "221 Service closing control connection.\r\n");
    assert!(client.at_eof().await);
}

#[tokio::test]
async fn auth_wrong_password_locks_the_session_out() {
    let _root = spawn_server(2152).await;
    let mut client = FtpClient::connect(2152).await;

    assert_eq!(client.read_reply().await, "220 Service ready for new user.\r\n");
    client.send("USER alice\r\n").await;
    assert_eq!(client.read_reply().await, "331 Username OK, need password.\r\n");
    client.send("PASS bad\r\n").await;
    assert_eq!(client.read_reply().await, "530 Not logged in.\r\n");

    client.send("PWD\r\n").await;
    assert_eq!(client.read_reply().await, "530 Not logged in.\r\n");
}

#[tokio::test]
async fn unknown_username_is_rejected() {
    let _root = spawn_server(2153).await;
    let mut client = FtpClient::connect(2153).await;

    assert_eq!(client.read_reply().await, "220 Service ready for new user.\r\n");
    client.send("USER mallory\r\n").await;
    assert_eq!(client.read_reply().await, "530 Not logged in.\r\n");
}

#[tokio::test]
async fn list_sends_bare_names_and_completes() {
    let root = spawn_server(2154).await;
    let mut client = login(2154).await;
    let jail = root.path().join("alice");
    std::fs::write(jail.join("notes.md"), b"n").unwrap();
    std::fs::write(jail.join("hello.txt"), b"h").unwrap();
    std::fs::write(jail.join(".hidden"), b"x").unwrap();

    let listener = declare_data_endpoint(&mut client).await;
    client.send("LIST\r\n").await;
    assert_eq!(client.read_reply().await, "150 File status okay; about to open data connection.\r\n");
    assert_eq!(receive_data(listener).await, b"hello.txt\r\nnotes.md\r\n");
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");
}

#[tokio::test]
async fn list_of_an_empty_directory_is_an_empty_stream() {
    let _root = spawn_server(2155).await;
    let mut client = login(2155).await;

    let listener = declare_data_endpoint(&mut client).await;
    client.send("LIST\r\n").await;
    assert_eq!(client.read_reply().await, "150 File status okay; about to open data connection.\r\n");
    assert_eq!(receive_data(listener).await, b"");
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");
}

#[tokio::test]
async fn directory_escape_is_rejected_and_cwd_unchanged() {
    let _root = spawn_server(2156).await;
    let mut client = login(2156).await;

    client.send("CWD ../..\r\n").await;
    assert_eq!(client.read_reply().await, "550 Permission denied.\r\n");

    client.send("PWD\r\n").await;
    assert_eq!(client.read_reply().await, "257 \"/alice/\"\r\n");
}

#[tokio::test]
async fn stor_round_trip_is_atomic() {
    let root = spawn_server(2157).await;
    let mut client = login(2157).await;
    let payload = vec![0x58_u8; 4096];

    let listener = declare_data_endpoint(&mut client).await;
    client.send("STOR doc.bin\r\n").await;
    assert_eq!(client.read_reply().await, "150 File status okay; about to open data connection.\r\n");
    send_data(listener, &payload).await;
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");

    let jail = root.path().join("alice");
    assert_eq!(std::fs::read(jail.join("doc.bin")).unwrap(), payload);
    let names: Vec<String> = std::fs::read_dir(&jail)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!names.iter().any(|n| n.starts_with("tmp_")), "temp file left behind: {names:?}");
}

#[tokio::test]
async fn retr_round_trip_is_byte_exact() {
    let root = spawn_server(2158).await;
    let mut client = login(2158).await;
    let jail = root.path().join("alice");
    let payload: Vec<u8> = (0..=255_u8).cycle().take(10_000).collect();
    std::fs::write(jail.join("blob.bin"), &payload).unwrap();

    let listener = declare_data_endpoint(&mut client).await;
    client.send("RETR blob.bin\r\n").await;
    assert_eq!(client.read_reply().await, "150 File status okay; about to open data connection.\r\n");
    assert_eq!(receive_data(listener).await, payload);
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");
}

#[tokio::test]
async fn retr_of_a_zero_byte_file_closes_immediately() {
    let root = spawn_server(2159).await;
    let mut client = login(2159).await;
    std::fs::write(root.path().join("alice").join("empty"), b"").unwrap();

    let listener = declare_data_endpoint(&mut client).await;
    client.send("RETR empty\r\n").await;
    assert_eq!(client.read_reply().await, "150 File status okay; about to open data connection.\r\n");
    assert_eq!(receive_data(listener).await, b"");
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");
}

#[tokio::test]
async fn data_commands_without_a_declared_endpoint_get_425() {
    let _root = spawn_server(2160).await;
    let mut client = login(2160).await;

    client.send("RETR anything\r\n").await;
    assert_eq!(client.read_reply().await, "425 Can't open data connection.\r\n");
}

#[tokio::test]
async fn retr_of_a_missing_file_skips_the_150() {
    let _root = spawn_server(2161).await;
    let mut client = login(2161).await;

    let _listener = declare_data_endpoint(&mut client).await;
    client.send("RETR nope.bin\r\n").await;
    assert_eq!(client.read_reply().await, "550 No such file or directory.\r\n");

    // The endpoint was consumed by the failed attempt.
    client.send("RETR nope.bin\r\n").await;
    assert_eq!(client.read_reply().await, "425 Can't open data connection.\r\n");
}

#[tokio::test]
async fn port_with_an_octet_overflow_is_a_parameter_error() {
    let _root = spawn_server(2162).await;
    let mut client = login(2162).await;

    client.send("PORT 127,0,0,1,300,1\r\n").await;
    assert_eq!(client.read_reply().await, "501 Syntax error in parameters or arguments.\r\n");
}

#[tokio::test]
async fn mkd_cwd_pwd_rmd_flow() {
    let _root = spawn_server(2163).await;
    let mut client = login(2163).await;

    client.send("MKD reports\r\n").await;
    assert_eq!(client.read_reply().await, "257 \"/alice/reports\"\r\n");

    client.send("CWD reports\r\n").await;
    assert_eq!(client.read_reply().await, "200 directory changed to /alice/reports\r\n");

    client.send("PWD\r\n").await;
    assert_eq!(client.read_reply().await, "257 \"/alice/reports/\"\r\n");

    client.send("CWD ..\r\n").await;
    assert_eq!(client.read_reply().await, "200 directory changed to /alice\r\n");

    client.send("RMD reports\r\n").await;
    assert_eq!(client.read_reply().await, "250 Requested file action okay, completed.\r\n");
}

#[tokio::test]
async fn dele_removes_a_file() {
    let root = spawn_server(2164).await;
    let mut client = login(2164).await;
    let target = root.path().join("alice").join("junk.txt");
    std::fs::write(&target, b"junk").unwrap();

    client.send("DELE junk.txt\r\n").await;
    assert_eq!(client.read_reply().await, "250 Requested file action okay, completed.\r\n");
    assert!(!target.exists());
}

#[tokio::test]
async fn rename_needs_an_uninterrupted_rnfr_rnto_pair() {
    let root = spawn_server(2165).await;
    let mut client = login(2165).await;
    let jail = root.path().join("alice");
    std::fs::write(jail.join("old.txt"), b"payload").unwrap();

    // RNTO with nothing pending.
    client.send("RNTO new.txt\r\n").await;
    assert_eq!(client.read_reply().await, "503 Bad sequence of commands.\r\n");

    // An intervening command clears the pending source.
    client.send("RNFR old.txt\r\n").await;
    assert_eq!(client.read_reply().await, "350 Requested file action pending further information.\r\n");
    client.send("PWD\r\n").await;
    assert_eq!(client.read_reply().await, "257 \"/alice/\"\r\n");
    client.send("RNTO new.txt\r\n").await;
    assert_eq!(client.read_reply().await, "503 Bad sequence of commands.\r\n");

    // The uninterrupted pair succeeds.
    client.send("RNFR old.txt\r\n").await;
    assert_eq!(client.read_reply().await, "350 Requested file action pending further information.\r\n");
    client.send("RNTO new.txt\r\n").await;
    assert_eq!(client.read_reply().await, "250 Requested file action okay, completed.\r\n");
    assert!(jail.join("new.txt").exists());
    assert!(!jail.join("old.txt").exists());
}

#[tokio::test]
async fn unimplemented_verbs_reply_202_after_login_and_530_before() {
    let _root = spawn_server(2166).await;
    let mut client = FtpClient::connect(2166).await;
    assert_eq!(client.read_reply().await, "220 Service ready for new user.\r\n");

    client.send("SYST\r\n").await;
    assert_eq!(client.read_reply().await, "530 Not logged in.\r\n");

    client.send("USER alice\r\n").await;
    assert_eq!(client.read_reply().await, "331 Username OK, need password.\r\n");
    client.send("PASS wonderland\r\n").await;
    assert_eq!(client.read_reply().await, "230 User logged in, proceed.\r\n");

    client.send("SYST\r\n").await;
    assert_eq!(client.read_reply().await, "202 Command not implemented.\r\n");

    client.send("\r\n").await;
    assert_eq!(client.read_reply().await, "500 Syntax error, command unrecognized.\r\n");
}

#[tokio::test]
async fn session_cap_turns_extra_connections_away() {
    let root = tempfile::tempdir().unwrap();
    let users = root.path().join("users.csv");
    std::fs::write(&users, common::CREDENTIALS).unwrap();
    let authenticator = CsvFileAuthenticator::from_file(&users).unwrap();
    let server = Server::new(root.path().to_path_buf(), Arc::new(authenticator))
        .data_port(0)
        .max_sessions(1);
    tokio::spawn(async move {
        server.listen("127.0.0.1:2167").await.unwrap();
    });

    let mut first = FtpClient::connect(2167).await;
    assert_eq!(first.read_reply().await, "220 Service ready for new user.\r\n");

    let mut second = FtpClient::connect(2167).await;
    assert_eq!(second.read_reply().await, "421 Service not available, closing control connection.\r\n");
    assert!(second.at_eof().await);

    // Ending the first session frees the slot. The permit is released when
    // the loop task winds down, so give it a few tries.
    first.send("QUIT\r\n").await;
    assert_eq!(first.read_reply().await, "221 Service closing control connection.\r\n");
    assert!(first.at_eof().await);

    let mut greeted = false;
    for _ in 0..50 {
        let mut third = FtpClient::connect(2167).await;
        if third.read_reply().await.starts_with("220") {
            greeted = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(greeted, "slot was never released after QUIT");
}

#[tokio::test]
async fn stor_into_a_subdirectory_with_spaces_in_the_name() {
    let root = spawn_server(2168).await;
    let mut client = login(2168).await;

    client.send("MKD year 2026\r\n").await;
    assert_eq!(client.read_reply().await, "257 \"/alice/year 2026\"\r\n");
    client.send("CWD year 2026\r\n").await;
    assert_eq!(client.read_reply().await, "200 directory changed to /alice/year 2026\r\n");

    let listener = declare_data_endpoint(&mut client).await;
    client.send("STOR q1 report.txt\r\n").await;
    assert_eq!(client.read_reply().await, "150 File status okay; about to open data connection.\r\n");
    send_data(listener, b"all good").await;
    assert_eq!(client.read_reply().await, "226 Transfer complete.\r\n");

    let stored = root.path().join("alice").join("year 2026").join("q1 report.txt");
    assert_eq!(std::fs::read(stored).unwrap(), b"all good");
}
