//! Answering questions from retrieved passages and drafting factoid
//! question/answer pairs from chunks, both through a [`ChatProvider`].

use crate::chat::{ChatProvider, Message};
use crate::error::ChatError;
use crate::eval::EvalSample;

/// Stored as the answer when the model returns nothing.
pub const NO_ANSWER: &str = "Sin respuesta";

const QUESTION_MARKER: &str = "Factoid question: ";
const ANSWER_MARKER: &str = "Answer: ";

const ANSWER_INSTRUCTIONS: &str = "Usa el contexto recuperado a continuación para responder la \
pregunta de manera precisa. Si la respuesta no puede determinarse a partir del contexto, indica \
que no lo sabes y discúlpate. Sé claro y proporciona una respuesta relevante relacionada con las \
regulaciones alimentarias en Chile.";

const FACTOID_INSTRUCTIONS: &str = "Tu tarea es escribir una pregunta factual y una respuesta \
dada un contexto.
Tu pregunta factual debe poder responderse con una pieza de información específica y concisa \
del contexto.
Tu pregunta factual debe formularse con el mismo estilo que las preguntas que los usuarios \
podrían hacer en un motor de búsqueda.
Esto significa que tu pregunta factual NO DEBE mencionar expresiones como \"según el pasaje\" o \
\"contexto\".

Proporciona tu respuesta de la siguiente manera:

Output:::
Factoid question: (tu pregunta factual)
Answer: (tu respuesta a la pregunta factual)

Ahora aquí está el contexto.";

/// Prompt asking for an answer to `question` grounded in `contexts`, best
/// passage first.
#[must_use]
pub fn answer_messages(question: &str, contexts: &[String]) -> Vec<Message> {
    vec![Message::user(format!(
        "{ANSWER_INSTRUCTIONS}\nQuestion: {question}\nContext: {}",
        contexts.join("\n\n")
    ))]
}

#[must_use]
pub fn factoid_messages(context: &str) -> Vec<Message> {
    vec![Message::user(format!(
        "{FACTOID_INSTRUCTIONS}\n\nContext: {context}\nOutput:::"
    ))]
}

/// Splits a `Factoid question: ... Answer: ...` reply into its two parts.
///
/// Returns `None` when either marker is missing or either part is blank.
#[must_use]
pub fn parse_factoid(output: &str) -> Option<(String, String)> {
    let (_, after_question) = output.rsplit_once(QUESTION_MARKER)?;
    let (question, _) = after_question.split_once(ANSWER_MARKER)?;
    let (_, answer) = output.rsplit_once(ANSWER_MARKER)?;
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() || answer.is_empty() {
        return None;
    }
    Some((question.to_owned(), answer.to_owned()))
}

/// Generates an answer to `question` from `contexts`. A blank reply becomes
/// [`NO_ANSWER`].
///
/// # Errors
///
/// Returns the provider error.
pub async fn answer(
    chat: &dyn ChatProvider,
    question: &str,
    contexts: &[String],
) -> Result<String, ChatError> {
    let reply = chat.chat(&answer_messages(question, contexts)).await?;
    let reply = reply.trim();
    if reply.is_empty() {
        tracing::warn!(provider = chat.name(), question, "empty answer");
        return Ok(NO_ANSWER.to_owned());
    }
    Ok(reply.to_owned())
}

/// Asks for one factoid pair per context. Replies that do not follow the
/// expected format are skipped.
///
/// # Errors
///
/// Returns the first provider error.
pub async fn generate_samples<S: AsRef<str>>(
    chat: &dyn ChatProvider,
    contexts: &[S],
) -> Result<Vec<EvalSample>, ChatError> {
    let mut samples = Vec::with_capacity(contexts.len());
    for (index, context) in contexts.iter().enumerate() {
        let reply = chat.chat(&factoid_messages(context.as_ref())).await?;
        let Some((question, reference)) = parse_factoid(&reply) else {
            tracing::warn!(index, "unparsable factoid reply skipped");
            continue;
        };
        samples.push(EvalSample {
            question,
            answer: None,
            reference,
            contexts: Vec::new(),
        });
    }
    tracing::info!(
        provider = chat.name(),
        requested = contexts.len(),
        generated = samples.len(),
        "factoid questions generated"
    );
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{MockChat, Role};

    #[test]
    fn parses_well_formed_reply() {
        let reply = "Output:::\nFactoid question: ¿Quién autoriza los aditivos?\n\
                     Answer: El Ministerio de Salud.\n";
        assert_eq!(
            parse_factoid(reply),
            Some((
                "¿Quién autoriza los aditivos?".to_owned(),
                "El Ministerio de Salud.".to_owned()
            ))
        );
    }

    #[test]
    fn last_markers_win() {
        let reply = "Factoid question: borrador Answer: x\n\
                     Factoid question: ¿Cuál es el plazo? Answer: Treinta días.";
        let (question, answer) = parse_factoid(reply).unwrap();
        assert_eq!(question, "¿Cuál es el plazo?");
        assert_eq!(answer, "Treinta días.");
    }

    #[test]
    fn missing_or_blank_parts_rejected() {
        assert_eq!(parse_factoid("Answer: sola"), None);
        assert_eq!(parse_factoid("Factoid question: ¿sola?"), None);
        assert_eq!(parse_factoid("Factoid question:   Answer: algo"), None);
        assert_eq!(parse_factoid("Factoid question: ¿algo? Answer:   "), None);
    }

    #[test]
    fn answer_prompt_carries_question_and_joined_contexts() {
        let messages = answer_messages("¿Qué?", &["uno".into(), "dos".into()]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.contains("Question: ¿Qué?"));
        assert!(messages[0].content.ends_with("Context: uno\n\ndos"));
    }

    #[test]
    fn factoid_prompt_ends_with_output_marker() {
        let messages = factoid_messages("Artículo 1.");
        assert!(messages[0].content.contains("Context: Artículo 1."));
        assert!(messages[0].content.ends_with("Output:::"));
    }

    #[tokio::test]
    async fn blank_answer_becomes_placeholder() {
        let chat = MockChat::with_responses(vec!["  \n".into(), " Bajo cinco grados. ".into()]);
        let contexts = vec!["La leche se refrigera.".to_owned()];
        assert_eq!(answer(&chat, "¿Temperatura?", &contexts).await.unwrap(), NO_ANSWER);
        assert_eq!(
            answer(&chat, "¿Temperatura?", &contexts).await.unwrap(),
            "Bajo cinco grados."
        );
    }

    #[tokio::test]
    async fn generation_skips_unparsable_replies() {
        let chat = MockChat::with_responses(vec![
            "Factoid question: ¿Quién autoriza los aditivos? Answer: El Ministerio.".into(),
            "no sé".into(),
        ]);
        let samples = generate_samples(&chat, &["aditivos", "leche"]).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].reference, "El Ministerio.");
        assert!(samples[0].answer.is_none());

        let requests = chat.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1][0].content.contains("Context: leche"));
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let result = generate_samples(&MockChat::failing(), &["x"]).await;
        assert!(matches!(result, Err(ChatError::Other(_))));
    }
}
