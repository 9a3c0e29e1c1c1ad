//! Admin commands: parsing and reply texts (Telegram Markdown)

use crate::config::validate_offset;
use crate::core::paths::{commands as names, offset};
use crate::store::Prediction;

use super::status::{ChannelHealth, Counters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Status,
    SetOffset(Option<String>),
    TransferOn,
    TransferOff,
    CheckChannels,
    Debug,
}

/// Parse `/name[@bot] [args]`. Unknown commands yield `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let mut parts = text.split_whitespace();
    let head = parts.next()?;
    let name = head.split('@').next().unwrap_or(head).to_ascii_lowercase();
    let command = match name.as_str() {
        names::START => Command::Start,
        names::HELP => Command::Help,
        names::STATUS => Command::Status,
        names::SET_OFFSET => Command::SetOffset(parts.next().map(String::from)),
        names::TRANSFER_ON => Command::TransferOn,
        names::TRANSFER_OFF => Command::TransferOff,
        names::CHECK_CHANNELS => Command::CheckChannels,
        names::DEBUG => Command::Debug,
        _ => return None,
    };
    Some(command)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("⛔ Réservé à l'admin")]
    NotAdmin,
    #[error("❌ Usage: `/setoffset <nombre>`\nEx: `/setoffset 3`")]
    MissingArgument,
    #[error("❌ Nombre invalide")]
    NotANumber,
    #[error("❌ L'offset doit être entre {min} et {max}", min = offset::MIN, max = offset::MAX)]
    OutOfRange,
}

/// Validate a `/setoffset` request.
pub fn parse_offset_request(is_admin: bool, argument: Option<&str>) -> Result<u32, CommandError> {
    if !is_admin {
        return Err(CommandError::NotAdmin);
    }
    let raw = argument.ok_or(CommandError::MissingArgument)?;
    let value: i64 = raw.trim().parse().map_err(|_| CommandError::NotANumber)?;
    let value = u32::try_from(value).map_err(|_| CommandError::OutOfRange)?;
    validate_offset(value).map_err(|_| CommandError::OutOfRange)
}

pub fn offset_changed_text(value: u32) -> String {
    format!("✅ Offset modifié: *{value}*\nProchaines prédictions: N+{value}")
}

pub fn start_text(prediction_offset: u32) -> String {
    format!(
        "🤖 *Bot Prédiction Baccarat*\n\n\
🎯 *Règle:* Prédiction quand 2 cartes de même couleur dans le 2ème groupe\n\
📏 *Offset:* N + {prediction_offset}\n\n\
*Commandes:*\n\
• `/status` - Voir les prédictions actives\n\
• `/setoffset <n>` - Changer l'offset (admin)\n\
• `/transfert` - Activer le transfert\n\
• `/stoptransfert` - Désactiver le transfert\n\
• `/checkchannels` - Vérifier les canaux\n\
• `/debug` - Informations système\n\
• `/help` - Aide complète"
    )
}

pub fn help_text(prediction_offset: u32) -> String {
    format!(
        "📖 *Aide Bot Prédiction*\n\n\
*🎯 Règle de prédiction:*\n\
Quand le *2ème groupe* contient *2 cartes de même couleur*:\n\
→ Prédiction pour le jeu *N + {prediction_offset}*\n\n\
*Exemple:*\n\
```\n#N430. ✅4(10♦️5♠️9♠️) - 0(10♥️J♥️K♦️) #T4\n```\n\
2ème groupe: (10♥️J♥️K♦️) → 2×❤️\n\
→ Prédiction #{example}: ❤️ Cœur\n\n\
*⚡ Fonctionnement:*\n\
1. Détection immédiate (pas d'attente finalisation)\n\
2. Vérification uniquement sur messages finalisés\n\
3. Statuts: ✅0️⃣ ✅1️⃣ ✅2️⃣ ou ❌",
        example = 430 + prediction_offset
    )
}

pub fn status_text(current_game: u32, prediction_offset: u32, predictions: &[Prediction]) -> String {
    let mut text = format!(
        "📊 *État du Bot*\n\n🎮 Jeu actuel: #{current_game}\n📏 Offset: N+{prediction_offset}\n\n"
    );
    if predictions.is_empty() {
        text.push_str("*🔮 Aucune prédiction active*\n");
        return text;
    }
    text.push_str(&format!("*🔮 Prédictions actives ({}):*\n", predictions.len()));
    for p in predictions {
        text.push_str(&format!(
            "• #{}: {} {} ({})\n",
            p.target,
            p.suit.emoji(),
            p.suit.name(),
            p.status.code()
        ));
    }
    text
}

pub struct DebugView<'a> {
    pub source_channel: i64,
    pub prediction_channel: i64,
    pub admin_id: Option<i64>,
    pub prediction_offset: u32,
    pub transfer_enabled: bool,
    pub current_game: u32,
    pub active_predictions: usize,
    pub channels: ChannelHealth,
    pub counters: &'a Counters,
}

fn flag(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}

pub fn debug_text(view: &DebugView<'_>) -> String {
    let c = view.counters;
    format!(
        "🔍 *Debug Info:*\n\n\
*Config:*\n\
• Source: {source}\n\
• Prédiction: {prediction}\n\
• Admin: {admin}\n\
• Offset: {offset}\n\
• Transfert: {transfer}\n\n\
*Statut:*\n\
• Source OK: {source_ok}\n\
• Prédiction OK: {prediction_ok}\n\
• Jeu actuel: #{game}\n\
• Prédictions: {active}\n\n\
*Compteurs:*\n\
• Événements: {events}\n\
• Messages source: {messages}\n\
• Doublons ignorés: {duplicates}\n\
• Messages incomplets: {parse_failures}\n\
• Prédictions créées: {created}\n\
• Gagnées / Perdues: {wins} / {losses}\n\
• Transferts: {forwarded}\n\
• Échecs d'envoi: {outbound}\n\
• Erreurs: {errors}\n\n\
*Version:* {version}",
        source = view.source_channel,
        prediction = view.prediction_channel,
        admin = view.admin_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
        offset = view.prediction_offset,
        transfer = flag(view.transfer_enabled),
        source_ok = flag(view.channels.source_ok),
        prediction_ok = flag(view.channels.prediction_ok),
        game = view.current_game,
        active = view.active_predictions,
        events = c.events,
        messages = c.source_messages,
        duplicates = c.duplicates,
        parse_failures = c.parse_failures,
        created = c.predictions_created,
        wins = c.wins,
        losses = c.losses,
        forwarded = c.forwarded,
        outbound = c.outbound_failures,
        errors = c.handler_errors,
        version = crate::core::paths::VERSION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("/status"), Some(Command::Status));
        assert_eq!(parse_command("/START"), Some(Command::Start));
        assert_eq!(parse_command("/status@oracle_bot"), Some(Command::Status));
        assert_eq!(parse_command("/setoffset 4"), Some(Command::SetOffset(Some("4".into()))));
        assert_eq!(parse_command("/setoffset"), Some(Command::SetOffset(None)));
        assert_eq!(parse_command("/stoptransfert"), Some(Command::TransferOff));
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn every_registered_command_parses() {
        for name in names::ALL {
            assert!(parse_command(name).is_some(), "{name}");
        }
    }

    #[test]
    fn offset_request_validation() {
        assert_eq!(parse_offset_request(true, Some("3")), Ok(3));
        assert_eq!(parse_offset_request(false, Some("3")), Err(CommandError::NotAdmin));
        assert_eq!(parse_offset_request(true, None), Err(CommandError::MissingArgument));
        assert_eq!(parse_offset_request(true, Some("x")), Err(CommandError::NotANumber));
        assert_eq!(parse_offset_request(true, Some("0")), Err(CommandError::OutOfRange));
        assert_eq!(parse_offset_request(true, Some("11")), Err(CommandError::OutOfRange));
        assert_eq!(parse_offset_request(true, Some("-1")), Err(CommandError::OutOfRange));
        assert_eq!(CommandError::OutOfRange.to_string(), "❌ L'offset doit être entre 1 et 10");
    }

    #[test]
    fn status_lists_predictions() {
        let text = status_text(430, 2, &[Prediction::new(432, Suit::Heart, 430)]);
        assert!(text.contains("Jeu actuel: #430"));
        assert!(text.contains("• #432: ❤️ Cœur (⏳⏳)"));

        assert!(status_text(0, 2, &[]).contains("Aucune prédiction active"));
    }

    #[test]
    fn help_uses_current_offset() {
        assert!(help_text(3).contains("Prédiction #433"));
        assert!(start_text(5).contains("N + 5"));
    }
}
