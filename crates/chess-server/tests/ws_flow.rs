//! WebSocket flow tests against a live listener.

use chess_server::{router, AppState, GameHandle, ServerConfig};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_server() -> SocketAddr {
    let config = ServerConfig::default();
    spawn_server_with(AppState::new(&config)).await
}

async fn spawn_server_with(state: AppState) -> SocketAddr {
    let app = router(state, &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

async fn recv(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn send(client: &mut Client, value: Value) {
    client.send(Message::Text(value.to_string())).await.unwrap();
}

/// Reads the three sync messages and returns them in order.
async fn recv_sync(client: &mut Client) -> [Value; 3] {
    let state = recv(client).await;
    let history = recv(client).await;
    let turn = recv(client).await;
    assert_eq!(state["type"], "game_state");
    assert_eq!(history["type"], "game_history");
    assert_eq!(turn["type"], "current_turn");
    [state, history, turn]
}

#[tokio::test]
async fn new_client_receives_current_state() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;

    let [state, history, turn] = recv_sync(&mut client).await;
    assert_eq!(state["board"][7][4], "K");
    assert_eq!(history["moves"], json!([]));
    assert_eq!(turn["turn"], "white");
}

#[tokio::test]
async fn accepted_move_reaches_every_observer() {
    let addr = spawn_server().await;
    let mut white = connect(addr).await;
    let mut black = connect(addr).await;
    recv_sync(&mut white).await;
    recv_sync(&mut black).await;

    send(&mut white, json!({"type": "move", "from": [6, 4], "to": [4, 4]})).await;

    for client in [&mut white, &mut black] {
        let mv = recv(client).await;
        assert_eq!(mv, json!({"type": "move", "from": [6, 4], "to": [4, 4]}));
        let [state, history, turn] = recv_sync(client).await;
        assert_eq!(state["board"][4][4], "P");
        assert_eq!(state["board"][6][4], "");
        assert_eq!(history["moves"].as_array().unwrap().len(), 1);
        assert_eq!(turn["turn"], "black");
    }
}

#[tokio::test]
async fn invalid_move_goes_only_to_sender() {
    let addr = spawn_server().await;
    let mut sender = connect(addr).await;
    let mut observer = connect(addr).await;
    recv_sync(&mut sender).await;
    recv_sync(&mut observer).await;

    send(&mut sender, json!({"type": "move", "from": [1, 4], "to": [3, 4]})).await;
    let reply = recv(&mut sender).await;
    assert_eq!(reply["type"], "invalid_move");
    assert_eq!(reply["message"], "not your turn: white to move");

    // the observer's next message is the result of a later valid move
    send(&mut sender, json!({"type": "move", "from": [6, 3], "to": [4, 3]})).await;
    let next = recv(&mut observer).await;
    assert_eq!(next, json!({"type": "move", "from": [6, 3], "to": [4, 3]}));
}

#[tokio::test]
async fn garbage_frame_gets_error() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;
    recv_sync(&mut client).await;

    client
        .send(Message::Text("{not json".to_string()))
        .await
        .unwrap();
    let reply = recv(&mut client).await;
    assert_eq!(reply["type"], "error");

    // the connection stays usable
    send(&mut client, json!({"type": "move", "from": [7, 6], "to": [5, 5]})).await;
    let mv = recv(&mut client).await;
    assert_eq!(mv["type"], "move");
}

#[tokio::test]
async fn checkmate_ends_game_for_everyone() {
    let addr = spawn_server().await;
    let mut player = connect(addr).await;
    let mut observer = connect(addr).await;
    recv_sync(&mut player).await;
    recv_sync(&mut observer).await;

    // f3 e5 g4 Qh4 a3 Qxe1
    let script = [
        ([6, 5], [5, 5]),
        ([1, 4], [3, 4]),
        ([6, 6], [4, 6]),
        ([0, 3], [4, 7]),
        ([6, 0], [5, 0]),
    ];
    for (from, to) in script {
        send(&mut player, json!({"type": "move", "from": from, "to": to})).await;
        assert_eq!(recv(&mut observer).await["type"], "move");
        recv_sync(&mut observer).await;
    }

    send(&mut player, json!({"type": "move", "from": [4, 7], "to": [7, 4]})).await;
    let [state, history, turn] = recv_sync(&mut observer).await;
    assert_eq!(state["board"][7][4], "q");
    assert_eq!(history["moves"].as_array().unwrap().len(), 6);
    assert_eq!(turn["turn"], "black");
    let over = recv(&mut observer).await;
    assert_eq!(over["type"], "game_over");
    assert_eq!(over["message"], "Checkmate! Game over.");
    assert_eq!(over["winner"], "black");

    send(&mut player, json!({"type": "move", "from": [6, 1], "to": [5, 1]})).await;
    loop {
        let msg = recv(&mut player).await;
        if msg["type"] == "invalid_move" {
            assert_eq!(msg["message"], "game has already ended");
            break;
        }
    }
}

#[tokio::test]
async fn new_game_resets_for_everyone() {
    let addr = spawn_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    recv_sync(&mut a).await;
    recv_sync(&mut b).await;

    send(&mut a, json!({"type": "move", "from": [6, 4], "to": [4, 4]})).await;
    recv(&mut b).await;
    recv_sync(&mut b).await;

    send(&mut b, json!({"type": "new_game"})).await;
    let [state, history, turn] = recv_sync(&mut b).await;
    assert_eq!(state["board"][6][4], "P");
    assert_eq!(history["moves"], json!([]));
    assert_eq!(turn["turn"], "white");

    // a late joiner sees the fresh game too
    let mut c = connect(addr).await;
    let [_, history, turn] = recv_sync(&mut c).await;
    assert_eq!(history["moves"], json!([]));
    assert_eq!(turn["turn"], "white");
}

#[tokio::test]
async fn lagging_observer_is_resynchronized() {
    // one message of buffer: every move overflows it
    let state = AppState {
        game: GameHandle::new(1),
    };
    let addr = spawn_server_with(state.clone()).await;
    let mut observer = connect(addr).await;
    recv_sync(&mut observer).await;

    state.game.submit_move((6, 4), (4, 4)).await.unwrap();
    state.game.submit_move((1, 4), (3, 4)).await.unwrap();

    // whatever was skipped, the last messages describe the game after both moves
    let mut board = Value::Null;
    let mut history_len = 0;
    loop {
        let msg = recv(&mut observer).await;
        match msg["type"].as_str() {
            Some("game_state") => board = msg["board"].clone(),
            Some("game_history") => history_len = msg["moves"].as_array().unwrap().len(),
            Some("current_turn") if msg["turn"] == "white" => break,
            _ => {}
        }
    }
    assert_eq!(board[4][4], "P");
    assert_eq!(board[3][4], "p");
    assert_eq!(board[6][4], "");
    assert_eq!(history_len, 2);
}
