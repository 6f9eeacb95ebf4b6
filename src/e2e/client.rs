use std::{fs, time::Duration};
use tokio::{task::spawn_blocking, time::timeout};

use super::{daemon::StubDaemon, gen_package, random_bytes};
use crate::{
    app::{PropKind, ProxyKind, UninstallOutcome},
    channel::{CHUNK_SIZE, Channel},
    endpoint::Endpoint,
    messages::*,
    protocol::{self, Command, CommandTag},
};

const TEST_DEADLINE: Duration = Duration::from_secs(10);

/// Run blocking client code off the runtime, bounded by a deadline.
async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    timeout(TEST_DEADLINE, spawn_blocking(f))
        .await
        .expect("client call timed out")
        .unwrap()
}

fn ack(result: bool, org_cmd: &str) -> Option<Vec<u8>> {
    let reply = ActionResult {
        result,
        org_cmd: org_cmd.into(),
        err_info: None,
    };
    Some(protocol::encode(&reply).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn replies_of_every_chunk_boundary_are_reassembled() {
    for size in [0, 1, CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE + 1, 5 * CHUNK_SIZE] {
        let payload = random_bytes(size);
        let reply = payload.clone();
        let daemon = StubDaemon::start(move |_, _| Some(reply.clone())).await;
        let root = daemon.socket_root();

        let got = blocking(move || {
            let mut channel =
                Channel::<GetInstalledAppList>::open_in(&root, Endpoint::Launcher);
            channel.connect().unwrap();
            channel
                .send(&GetInstalledAppList {
                    include_hide_app: true,
                })
                .unwrap();
            channel.receive_bytes().unwrap()
        })
        .await;

        assert_eq!(got.len(), size, "reply of {size} bytes");
        assert_eq!(&got[..], &payload[..]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_clipboard_is_fire_and_forget() {
    let daemon = StubDaemon::start(|_, _| None).await;
    let client = daemon.client();

    blocking(move || client.send_clipboard("")).await.unwrap();

    let received = daemon.wait_received(1).await;
    assert_eq!(received.len(), 1);
    let conn = &received[0];
    assert_eq!(conn.endpoint, Endpoint::Manager);
    assert_eq!(&conn.frame[..4], &[0, 0, 0, 7]);
    assert_eq!(conn.tag(), Some(Command::SetClipboard.tag()));
    assert!(conn.peer_closed, "client must close without reading");
    let msg: SetClipboard = protocol::decode(conn.body()).unwrap();
    assert_eq!(msg.content, "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn notifications_reach_their_endpoint() {
    let daemon = StubDaemon::start(|_, _| None).await;
    let client = daemon.client();

    blocking(move || {
        client.focus_window(2).unwrap();
        client
            .update_network_proxy(true, ProxyKind::Socks, "127.0.0.1", 1080)
            .unwrap();
        client.answer_call(false).unwrap();
    })
    .await;

    let received = daemon.wait_received(3).await;
    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|r| r.peer_closed));

    let focus = received
        .iter()
        .find(|r| r.tag() == Some(Command::FocusWin.tag()))
        .unwrap();
    assert_eq!(focus.endpoint, Endpoint::Launcher);
    let focus: FocusWin = protocol::decode(focus.body()).unwrap();
    assert_eq!(focus.focus_win, 2);

    let proxy = received
        .iter()
        .find(|r| r.tag() == Some(Command::SetProxy.tag()))
        .unwrap();
    assert_eq!(proxy.endpoint, Endpoint::Manager);
    let proxy: SetProxy = protocol::decode(proxy.body()).unwrap();
    assert!(proxy.open);
    assert_eq!(proxy.kind, "socks");
    assert_eq!(proxy.port, 1080);

    let call = received
        .iter()
        .find(|r| r.tag() == Some(Command::AnswerCall.tag()))
        .unwrap();
    assert_eq!(call.endpoint, Endpoint::Manager);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn install_round_trip() {
    let daemon = StubDaemon::start(|tag, body| {
        assert_eq!(tag, Command::InstallApp.tag());
        let req: InstallApp = protocol::decode(body).unwrap();
        ack(req.file_name.ends_with(".apk"), "")
    })
    .await;
    let client = daemon.client();
    let package = gen_package();

    let (ok, rejected) = blocking(move || {
        let ok = client
            .install_app(&format!("{package}.apk"), "Test", &package)
            .unwrap();
        let rejected = client.install_app("notes.txt", "Test", &package).unwrap();
        (ok, rejected)
    })
    .await;

    assert!(ok);
    assert!(!rejected);
    assert!(daemon.received().iter().all(|r| !r.peer_closed));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn successful_uninstall_cleans_desktop_entry() {
    let daemon = StubDaemon::start(|_, _| ack(false, "DELETE_SUCCEEDED")).await;
    let package = gen_package();
    let apps = daemon.home().join(".local/share/applications");
    fs::create_dir_all(&apps).unwrap();
    let desktop = apps.join(format!("{package}.desktop"));
    fs::write(&desktop, "[Desktop Entry]").unwrap();

    let client = daemon.client();
    let pkg = package.clone();
    let outcome = blocking(move || client.uninstall_app(&pkg)).await;

    assert_eq!(outcome, UninstallOutcome::Removed);
    assert!(!desktop.exists());
    let sent: UninstallApp = protocol::decode(daemon.received()[0].body()).unwrap();
    assert_eq!(sent.package_name, package);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_uninstall_keeps_desktop_entry() {
    let daemon = StubDaemon::start(|_, _| ack(false, "DELETE_FAILED_OWNER_BLOCKED")).await;
    let package = gen_package();
    let apps = daemon.home().join(".local/share/applications");
    fs::create_dir_all(&apps).unwrap();
    let desktop = apps.join(format!("{package}.desktop"));
    fs::write(&desktop, "[Desktop Entry]").unwrap();

    let client = daemon.client();
    let outcome = blocking(move || client.uninstall_app(&package)).await;

    assert_eq!(outcome, UninstallOutcome::OwnerBlocked);
    assert!(desktop.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn uninstall_without_reply_is_reply_lost() {
    let daemon = StubDaemon::start(|_, _| None).await;
    let client = daemon.client();

    let outcome = blocking(move || client.uninstall_app("com.example")).await;

    assert_eq!(outcome, UninstallOutcome::ReplyLost);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn installed_apps_are_listed() {
    let daemon = StubDaemon::start(|_, body| {
        let req: GetInstalledAppList = protocol::decode(body).unwrap();
        assert!(req.include_hide_app);
        let list = InstalledAppList {
            size: 2,
            item: vec![
                InstalledAppItem {
                    app_name: "WeChat".into(),
                    package_name: "com.tencent.mm".into(),
                    version_name: "8.0.0".into(),
                },
                InstalledAppItem {
                    app_name: "Notes".into(),
                    package_name: "com.example.notes".into(),
                    version_name: "1.2".into(),
                },
            ],
        };
        Some(protocol::encode(&list).unwrap())
    })
    .await;
    let client = daemon.client();

    let apps = blocking(move || client.installed_apps()).await.unwrap();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].package_name, "com.tencent.mm");
    assert_eq!(apps[1].version_name, "1.2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn system_prop_answer_must_echo_the_question() {
    let daemon = StubDaemon::start(|_, body| {
        let req: GetSystemProp = protocol::decode(body).unwrap();
        let value_field = if req.value_field == "ro.moved" {
            "ro.other".to_string()
        } else {
            req.value_field.clone()
        };
        let reply = SendSystemProp {
            event_type: req.event_type,
            value_field,
            value: "1080".into(),
        };
        Some(protocol::encode(&reply).unwrap())
    })
    .await;
    let client = daemon.client();

    let (matched, moved) = blocking(move || {
        (
            client.system_prop(PropKind::Prop, "ro.sf.lcd_density").unwrap(),
            client.system_prop(PropKind::Setting, "ro.moved").unwrap(),
        )
    })
    .await;

    assert_eq!(matched.as_deref(), Some("1080"));
    assert_eq!(moved, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn exact_chunk_reply_then_close() {
    let payload = random_bytes(CHUNK_SIZE);
    let reply = payload.clone();
    let daemon = StubDaemon::start(move |_, _| Some(reply.clone())).await;
    let root = daemon.socket_root();

    let got = blocking(move || {
        let mut channel = Channel::<GetRunningAppList>::open_in(&root, Endpoint::Launcher);
        channel.connect().unwrap();
        channel
            .send(&GetRunningAppList {
                with_thumbnail: false,
            })
            .unwrap();
        let got = channel.receive_bytes_within(Duration::from_secs(2));
        channel.close();
        got
    })
    .await
    .unwrap();

    assert_eq!(got.len(), CHUNK_SIZE);
    assert_eq!(&got[..], &payload[..]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn explicit_tag_is_carried_in_header() {
    let daemon = StubDaemon::start(|_, _| None).await;
    let root = daemon.socket_root();

    blocking(move || {
        let mut channel = Channel::<SetClipboard>::open_in(&root, Endpoint::Manager);
        channel.connect().unwrap();
        channel
            .send_frame(
                &SetClipboard {
                    content: "hello".into(),
                },
                CommandTag::new(7).unwrap(),
            )
            .unwrap();
    })
    .await;

    let received = daemon.wait_received(1).await;
    assert_eq!(received.len(), 1);
    assert_eq!(&received[0].frame[..4], &[0, 0, 0, 7]);
    let msg: SetClipboard = protocol::decode(received[0].body()).unwrap();
    assert_eq!(msg.content, "hello");
}
