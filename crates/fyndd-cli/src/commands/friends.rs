use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use fyndd_application::FynddApp;
use fyndd_core::friend::UserId;

use super::Output;

#[derive(Subcommand)]
pub enum FriendsAction {
    /// List your friends
    List,
    /// Find people by name or email
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Send a friend request
    Request { user_id: String },
    /// Accept an incoming request
    Accept { user_id: String },
    /// Reject an incoming request
    Reject { user_id: String },
    /// Remove a friend
    Remove { user_id: String },
    /// List incoming requests
    Requests,
    /// Show the request status for a user
    Status { user_id: String },
    /// Keep request state reconciled until interrupted
    Watch,
}

pub async fn run(app: &FynddApp, out: &Output, action: FriendsAction) -> Result<()> {
    let friends = &app.friends;
    match action {
        FriendsAction::List => out.users(&friends.refresh_friends().await?)?,
        FriendsAction::Search { query } => {
            // Refresh first so statuses reflect the server.
            if let Err(e) = friends.refresh_friends().await {
                tracing::warn!("[Friends] Could not refresh before search: {}", e);
            }
            let results = friends.search_users(&query.join(" ")).await?;
            out.user_search(&results)?;
        }
        FriendsAction::Request { user_id } => {
            friends.send_request(&UserId::from(user_id)).await?;
            out.success("Friend request sent.");
        }
        FriendsAction::Accept { user_id } => {
            friends.accept_request(&UserId::from(user_id)).await?;
            out.success("Friend request accepted.");
        }
        FriendsAction::Reject { user_id } => {
            friends.reject_request(&UserId::from(user_id)).await?;
            out.success("Friend request rejected.");
        }
        FriendsAction::Remove { user_id } => {
            friends.remove_friend(&UserId::from(user_id)).await?;
            out.success("Friend removed.");
        }
        FriendsAction::Requests => out.users(&friends.incoming_requests().await?)?,
        FriendsAction::Status { user_id } => {
            let user_id = UserId::from(user_id);
            if let Err(e) = friends.refresh_friends().await {
                tracing::warn!("[Friends] Could not refresh friends list: {}", e);
            }
            friends.reconciler().run_expiry_pass().await;
            out.status(friends.status_of(&user_id).await)?;
        }
        FriendsAction::Watch => watch(app).await?,
    }
    Ok(())
}

/// Runs the expiry scheduler and refreshes the friends list on the same
/// interval until Ctrl-C.
async fn watch(app: &FynddApp) -> Result<()> {
    let every = app.config.reconcile_interval();
    let cancel = CancellationToken::new();
    let scheduler = app.friends.start_expiry_scheduler(every, cancel.clone());

    println!("{}", "Watching friend requests, press Ctrl-C to stop.".dimmed());
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                match app.friends.refresh_friends().await {
                    Ok(list) => tracing::debug!("[Friends] {} friends", list.len()),
                    Err(e) => tracing::warn!("[Friends] Refresh failed: {}", e),
                }
            }
        }
    }

    cancel.cancel();
    scheduler.await?;
    Ok(())
}
