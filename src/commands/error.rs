use serenity::all::{
    Colour, CommandInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse,
};

fn error_embed(error_message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Error")
        .description(error_message)
        .color(Colour::RED)
}

/// Replies to an interaction that has not been acknowledged yet.
pub async fn run(
    context: &Context,
    interaction: &CommandInteraction,
    error_message: &str,
) -> anyhow::Result<()> {
    let message = CreateInteractionResponseMessage::new()
        .embed(error_embed(error_message))
        .ephemeral(true);

    interaction
        .create_response(&context.http, CreateInteractionResponse::Message(message))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send error response: {}", e))?;

    Ok(())
}

/// Replaces a deferred response with the error embed, dropping any text or attachments.
pub async fn edit_response(
    context: &Context,
    interaction: &CommandInteraction,
    error_message: &str,
) -> anyhow::Result<()> {
    let edit_message = EditInteractionResponse::new()
        .content("")
        .embed(error_embed(error_message))
        .clear_attachments();
    interaction
        .edit_response(&context.http, edit_message)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to edit error response: {}", e))?;

    Ok(())
}
