//! User-facing copy (Spanish).

use crate::ticket::Ticket;

pub const START: &str = "🤖 Hola, soy Beta‑Bot, tu asistente de soporte TI.\n\
                         Cuéntame tu problema o escribe /help para ver opciones.";

pub const HELP: &str = "Comandos disponibles:\n\
                        /start – Iniciar o reiniciar la asistencia.\n\
                        /reset – Reinicia el flujo desde cero.\n\
                        /cancel – Cancela la conversación actual.";

pub const RESET: &str = "🔄 Flujo reiniciado. ¿Cuál es tu problema?";

pub const CANCEL: &str =
    "🚪 Conversación cancelada. Puedes escribir /start cuando quieras volver a comenzar.";

pub const UNKNOWN_COMMAND: &str = "🤔 No reconozco ese comando. Escribe /help para ver opciones.";

pub const ASK_CONNECTION_TYPE: &str = "👉 ¿Tu conexión es por *cable* o *wifi*?";
pub const CONNECTION_TYPE_REPROMPT: &str = "Por favor responde *cable* o *wifi*.";

pub const CABLE_CHECK: &str =
    "🔌 Verifica que el cable esté conectado correctamente.\n¿Ya lo revisaste? (si/no)";
pub const WIFI_CHECK: &str =
    "📡 Revisa que tu WiFi esté encendido y conectado.\n¿Ya lo probaste? (si/no)";

pub const CHECKED_YES: &str = "✅ Perfecto. Si aún no funciona, intenta reiniciar el módem.\n\n\
                               🤖 ¿Se solucionó tu problema? (si/no)";
pub const CHECKED_NO: &str = "👉 Revisa primero la conexión y dime si se solucionó.\n\
                              🤖 ¿Quieres que espere mientras lo verificas? (si/no)";

pub const YES_NO_REPROMPT: &str = "Por favor responde 'si' o 'no'.";

pub const NO_MATCH: &str =
    "🤖 No encontré una solución en mis manuales. ¿Quieres levantar un ticket? (si/no)";

pub const ASK_ANOTHER_PROBLEM: &str = "🤖 ¿Tienes *otro* problema que quieras revisar? (si/no)";
pub const OFFER_TICKET: &str = "🤖 Entendido. Puedo ayudarte a levantar un ticket para seguimiento. \
                                ¿Deseas hacerlo? (si/no)";

pub const ASK_NAME: &str = "👤 Por favor, dime tu *nombre*:";
pub const TICKET_DECLINED: &str =
    "👍 De acuerdo. Si necesitas algo más, dime tu siguiente problema o usa /cancel para salir.";

pub const NEXT_PROBLEM: &str = "👍 De acuerdo, dime tu siguiente problema:";
pub const GOODBYE: &str =
    "👋 ¡Perfecto! Me alegra haberte ayudado. Escribe /start si quieres iniciar de nuevo.";

pub const ASK_EMAIL: &str = "📧 Ingresa tu *correo*:";
pub const INVALID_EMAIL: &str =
    "⚠️ El formato del correo no parece válido. Intenta de nuevo, por favor.";
pub const ASK_DESCRIPTION: &str = "📝 Describe tu *problema*:";
pub const ASK_PRIORITY: &str = "⚡ Prioridad (*baja*/*media*/*alta*):";

pub const SESSION_CLOSED: &str = "🚪 Cerrando la sesión. Gracias por contactarme.\n\
                                  🔁 Si necesitas más ayuda, escribe /start para iniciar una nueva sesión \
                                  o /reset para reiniciar.";

/// Answer followed by the "solved?" prompt.
pub fn answer_with_followup(answer: &str) -> String {
    format!("{answer}\n\n🤖 ¿Se solucionó tu problema? (si/no)")
}

/// Confirmation listing the stored ticket.
pub fn ticket_summary(ticket: &Ticket) -> String {
    format!(
        "✅ Ticket generado y guardado.\n\n\
         - Nombre: {}\n\
         - Correo: {}\n\
         - Descripción: {}\n\
         - Prioridad: {}",
        ticket.name, ticket.email, ticket.description, ticket.priority
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_every_field() {
        let t = Ticket {
            name: "Ana".into(),
            email: "ana@x.com".into(),
            description: "no enciende".into(),
            priority: "alta".into(),
        };
        assert_eq!(
            ticket_summary(&t),
            "✅ Ticket generado y guardado.\n\n- Nombre: Ana\n- Correo: ana@x.com\n\
             - Descripción: no enciende\n- Prioridad: alta"
        );
    }

    #[test]
    fn continuation_lines_keep_spacing() {
        assert!(OFFER_TICKET.contains("seguimiento. ¿Deseas"));
        assert!(SESSION_CLOSED.contains("nueva sesión o /reset"));
        assert!(HELP.starts_with("Comandos disponibles:\n/start"));
    }
}
