use crate::bot::{Handler, command_registry, helpers::command_handler};
use crate::commands;
use serenity::all::{GuildId, Interaction, Ready};
use serenity::prelude::*;

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, context: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if let Err(e) = command_handler::handle_slash_command(self, &context, &command).await {
            tracing::error!(
                "[BOT] There was an error processing /{}: {}",
                command.data.name,
                e
            );

            // The response may already be deferred, in which case only an edit can reach the user.
            let reported = commands::error::edit_response(
                &context,
                &command,
                "An unexpected error occurred. Please try again later.",
            )
            .await;
            if reported.is_err()
                && let Err(send_err) = commands::error::run(
                    &context,
                    &command,
                    "An unexpected error occurred. Please try again later.",
                )
                .await
            {
                tracing::error!("[BOT] Failed to send error response to user: {}", send_err);
            }
        }
    }

    async fn ready(&self, context: Context, ready: Ready) {
        tracing::info!("[BOT] {} is ready and connected!", ready.user.name);

        let commands_vec = command_registry::get_all_commands();
        let command_count = commands_vec.len();
        let guild_id = GuildId::new(self.config.guild_id);

        match guild_id.set_commands(&context.http, commands_vec).await {
            Ok(_) => tracing::info!(
                "[CMD] Successfully registered {} commands in guild {}",
                command_count,
                guild_id
            ),
            Err(e) => tracing::error!(
                "[CMD] Failed to register commands in guild {}: {}",
                guild_id,
                e
            ),
        }
    }
}
