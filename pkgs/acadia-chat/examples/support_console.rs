//! Walkthrough of an operator session against a seeded student directory
//!
//! Usage:
//!   cargo run --example support_console

use std::sync::Arc;

use anyhow::Result;

use acadia_chat::{ChatConfig, ChatSessionController, InMemoryDirectory, PendingUpload};
use acadia_store::{ChatEvent, ConversationFilter, MessageBody, StatusFilter, StudentProfile};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let directory = Arc::new(InMemoryDirectory::new());
    directory.insert(
        "s-1001",
        StudentProfile {
            name: "Alice Jones".to_string(),
            email: "alice@students.acadia.test".to_string(),
            avatar_url: None,
        },
    );
    directory.insert(
        "s-1002",
        StudentProfile {
            name: "Bob Stone".to_string(),
            email: "bob@students.acadia.test".to_string(),
            avatar_url: None,
        },
    );

    let mut controller = ChatSessionController::new(ChatConfig::default(), directory);
    let mut events = controller
        .take_event_receiver()
        .expect("event receiver already taken");

    // Operator adds both students to chat.
    let alice = controller.add_student("s-1001")?;
    controller.add_student("s-1002")?;

    // Two questions come in from Alice while nothing is selected.
    controller.message_arrived(
        "s-1001",
        MessageBody::Text {
            text: "Hi! I can't open lesson 3".to_string(),
        },
    )?;
    controller.message_arrived(
        "s-1001",
        MessageBody::Text {
            text: "the video player keeps loading".to_string(),
        },
    )?;
    controller.presence_changed("s-1001", true)?;

    println!("-- unread conversations --");
    controller.set_filter(ConversationFilter {
        search: String::new(),
        status: StatusFilter::Unread,
    });
    for conversation in controller.snapshot().conversations {
        println!(
            "{} <{}> [{} unread]",
            conversation.profile.name, conversation.profile.email, conversation.unread_count
        );
    }

    // Opening Alice's thread marks it read, then the operator replies.
    controller.select_conversation(&alice.id)?;
    controller.send_message("Hello Alice! Try refreshing - we just fixed the player.")?;
    controller.send_attachment(PendingUpload {
        file_name: "player-fix.png".to_string(),
        size: 48 * 1024,
        url: "https://cdn.acadia.test/uploads/player-fix.png".to_string(),
    })?;

    println!("-- thread with {} --", alice.profile.name);
    for message in controller.snapshot().thread {
        println!(
            "[{}] {:?}: {}",
            message.timestamp.format("%H:%M:%S"),
            message.sender,
            message.body.preview()
        );
    }

    println!("-- events --");
    while let Ok(event) = events.try_recv() {
        match event {
            ChatEvent::ConversationCreated { conversation } => {
                println!("conversation created for {}", conversation.profile.name);
            }
            ChatEvent::MessageAppended {
                conversation_id,
                message,
            } => {
                println!(
                    "message appended to {}: {}",
                    conversation_id,
                    message.body.preview()
                );
            }
            ChatEvent::ConversationRead {
                conversation_id,
                newly_read,
            } => {
                println!("{} messages read in {}", newly_read, conversation_id);
            }
            ChatEvent::PresenceChanged {
                conversation_id,
                is_online,
            } => {
                println!(
                    "presence in {}: {}",
                    conversation_id,
                    if is_online { "online" } else { "offline" }
                );
            }
        }
    }

    Ok(())
}
