use collab_realtime::{ChannelId, ChatPayload, RealtimeManager, TransportOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let endpoint =
        std::env::var("COLLAB_WS_ENDPOINT").unwrap_or_else(|_| "ws://localhost:8000/api/chat/ws".to_string());
    let token = std::env::var("COLLAB_TOKEN").expect("COLLAB_TOKEN must be set");
    let channel: u64 = std::env::var("COLLAB_CHANNEL")
        .unwrap_or_else(|_| "1".to_string())
        .parse()?;

    // One manager per process; clones share the connection registry.
    let manager = RealtimeManager::new(endpoint, TransportOptions::default())?;

    println!("Subscribing to channel {}...", channel);
    let mut subscription = manager.subscribe(ChannelId(channel), &token);

    // Say hello once the connection is up.
    let mut state = subscription.state_changes();
    while !subscription.is_connected() {
        state.changed().await?;
    }
    println!("Connected!");
    subscription.send(&ChatPayload::new("hello from collab-realtime")).await?;

    // Print the event stream until interrupted.
    loop {
        tokio::select! {
            event = subscription.next_event() => match event {
                Some(event) => println!("event: {}", event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!("Shutting down...");
    manager.shutdown().await;
    println!("Done!");

    Ok(())
}
