use crate::core::Suit;
use crate::store::Status;

pub fn format_prediction(target: u32, suit: Suit, status: Status) -> String {
    format!(
        "🎰 PRÉDICTION #{target}\n🎯 Couleur: {} {}\n📊 Statut: {}",
        suit.emoji(),
        suit.name(),
        status.label()
    )
}

pub fn format_forward(text: &str) -> String {
    format!("📨 *Message finalisé:*\n\n{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_prediction() {
        assert_eq!(
            format_prediction(432, Suit::Heart, Status::Pending),
            "🎰 PRÉDICTION #432\n🎯 Couleur: ❤️ Cœur\n📊 Statut: ⏳⏳"
        );
    }

    #[test]
    fn settled_prediction() {
        let text = format_prediction(9, Suit::Club, Status::Lost);
        assert!(text.ends_with("📊 Statut: ❌ PERDU"));
        assert!(text.contains("♣️ Trèfle"));
    }
}
