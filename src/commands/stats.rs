use std::time::Duration;

use crate::bot::Handler;
use crate::bot::helpers::upload::upload_png;
use crate::utils::card::draw_stats_card;
use crate::utils::wynncraft::WynncraftError;
use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, InteractionContext, ResolvedOption, ResolvedValue,
};
use serenity::builder::{CreateCommand, CreateCommandOption};

/// Upper bound on fetching and drawing one card.
pub const RENDER_DEADLINE: Duration = Duration::from_secs(60);

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &CommandInteraction,
) -> anyhow::Result<()> {
    let username = if let Some(ResolvedOption {
        value: ResolvedValue::String(username),
        ..
    }) = interaction.data.options().first()
    {
        username.trim().to_string()
    } else {
        String::new()
    };

    if username.is_empty() {
        crate::commands::error::run(context, interaction, "Please provide a username or UUID.")
            .await?;
        return Ok(());
    }

    interaction
        .create_response(
            &context.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    let buffer = match tokio::time::timeout(RENDER_DEADLINE, fetch_and_render(handler, &username))
        .await
    {
        Ok(Ok(buffer)) => buffer,
        Ok(Err(e)) => {
            tracing::error!("[STATS] Stats card for '{}' failed: {:#}", username, e);
            crate::commands::error::edit_response(context, interaction, &failure_message(&e, &username))
                .await?;
            return Ok(());
        }
        Err(_) => {
            tracing::error!(
                "[STATS] Stats card for '{}' exceeded {}s",
                username,
                RENDER_DEADLINE.as_secs()
            );
            crate::commands::error::edit_response(
                context,
                interaction,
                "Generating the stats card took too long. Please try again later.",
            )
            .await?;
            return Ok(());
        }
    };

    upload_png(context, interaction, buffer, "stats.png", "").await
}

async fn fetch_and_render(handler: &Handler, username: &str) -> anyhow::Result<Vec<u8>> {
    let player = handler.wynncraft.player(username).await?;
    tracing::info!("[STATS] Loaded player {} ({})", player.username, player.uuid);
    Ok(draw_stats_card(&player, handler).await?)
}

/// What the user is told when the card could not be produced.
pub fn failure_message(error: &anyhow::Error, username: &str) -> String {
    match error.downcast_ref::<WynncraftError>() {
        Some(WynncraftError::NotFound(_)) => {
            format!("Couldn't find a Wynncraft player called `{}`.", username)
        }
        Some(WynncraftError::DecodeFailed(_)) => {
            "The Wynncraft API sent data this bot doesn't understand.".to_string()
        }
        Some(_) => "Couldn't reach the Wynncraft API. Please try again later.".to_string(),
        None => "Failed to generate the stats card.".to_string(),
    }
}

pub fn register() -> CreateCommand {
    CreateCommand::new("stats")
        .description("Displays the wynncraft stats for a player.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "username",
                "The player's username or uuid.",
            )
            .required(true),
        )
        .contexts(vec![InteractionContext::Guild])
}
