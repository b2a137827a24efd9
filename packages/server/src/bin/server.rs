//! Hiroba live feed server.
//!
//! Clients subscribe to the geo feed (`/ws/events`) or to a comment thread
//! (`/ws/comments/{thread}`) and receive every broadcast for that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --fixtures fixtures.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use hiroba_server::{
    infrastructure::{
        dto::encoder::JsonPayloadEncoder,
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryCommentRepository, InMemoryEventRepository, InMemoryRoomRegistry,
            InMemoryUserRepository, load_fixtures,
        },
        side_effect::{KeywordSpamClassifier, SideEffectQueue, TracingCommentNotifier},
    },
    ui::{AppState, Server},
    usecase::{
        ConnectSubscriberUseCase, DisconnectSubscriberUseCase, GetThreadCommentsUseCase,
        ListRoomsUseCase, PostCommentUseCase, QueryEventsByLocationUseCase,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based live feed server for geo events and comment threads", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "debug")]
    log_level: String,

    /// JSON file with `users` and `events` to load at startup
    #[arg(long, env = "HIROBA_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// Word counted by the spam classifier (repeatable)
    #[arg(long = "blocked-word", value_name = "WORD")]
    blocked_words: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher and payload encoder
    // 3. Side-effect queue
    // 4. UseCases
    // 5. Server

    // 1. Create Repositories (in-memory stores)
    let registry = Arc::new(InMemoryRoomRegistry::<String>::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    let events = Arc::new(InMemoryEventRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());

    if let Some(path) = &args.fixtures {
        if let Err(e) = load_fixtures(path, users.as_ref(), events.as_ref()).await {
            tracing::error!("Failed to load fixtures from {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::<String>::new(registry.clone()));

    // 3. Start the side-effect worker
    let (side_effects, worker) = SideEffectQueue::start(
        Arc::new(KeywordSpamClassifier::new(&args.blocked_words)),
        Arc::new(TracingCommentNotifier),
        comments.clone(),
    );

    // 4. Create UseCases
    let clock = Arc::new(SystemClock);
    let encoder = Arc::new(JsonPayloadEncoder);
    let state = AppState {
        connect_subscriber_usecase: Arc::new(ConnectSubscriberUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            encoder.clone(),
            clock.clone(),
        )),
        disconnect_subscriber_usecase: Arc::new(DisconnectSubscriberUseCase::new(
            registry.clone(),
        )),
        query_events_usecase: Arc::new(QueryEventsByLocationUseCase::new(
            events.clone(),
            message_pusher.clone(),
            encoder.clone(),
        )),
        post_comment_usecase: Arc::new(PostCommentUseCase::new(
            comments.clone(),
            Arc::new(side_effects),
            message_pusher.clone(),
            encoder,
            clock,
        )),
        get_thread_comments_usecase: Arc::new(GetThreadCommentsUseCase::new(
            comments.clone(),
            users.clone(),
        )),
        list_rooms_usecase: Arc::new(ListRoomsUseCase::new(registry.clone())),
        users,
    };

    // 5. Create and run the server
    let result = Server::new(state).run(args.host, args.port).await;

    worker.shutdown().await;

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
