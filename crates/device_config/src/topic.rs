//! Regras de nomes e filtros de tópico MQTT (3.1.1, seção 4.7).

/// Tamanho máximo de um tópico MQTT em bytes.
pub const MAX_TOPIC_LEN: usize = 65535;

/// Problema encontrado num tópico.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    #[error("tópico vazio")]
    Empty,

    #[error("tópico excede {MAX_TOPIC_LEN} bytes")]
    TooLong,

    #[error("tópico contém caractere NUL")]
    ContainsNul,

    #[error("tópico de publicação não pode conter curingas ('+' ou '#')")]
    Wildcard,

    #[error("curinga mal posicionado no nível {0:?}")]
    MisplacedWildcard(String),
}

fn check_common(topic: &str) -> Result<(), TopicError> {
    if topic.is_empty() {
        return Err(TopicError::Empty);
    }
    if topic.len() > MAX_TOPIC_LEN {
        return Err(TopicError::TooLong);
    }
    if topic.contains('\0') {
        return Err(TopicError::ContainsNul);
    }
    Ok(())
}

/// Valida um nome de tópico usado em PUBLISH.
pub fn validate_topic_name(topic: &str) -> Result<(), TopicError> {
    check_common(topic)?;
    if topic.contains(['+', '#']) {
        return Err(TopicError::Wildcard);
    }
    Ok(())
}

/// Valida um filtro usado em SUBSCRIBE.
///
/// `+` ocupa um nível inteiro; `#` ocupa um nível inteiro e é o último.
pub fn validate_topic_filter(filter: &str) -> Result<(), TopicError> {
    check_common(filter)?;
    let levels: Vec<&str> = filter.split('/').collect();
    let last = levels.len() - 1;
    for (i, level) in levels.iter().enumerate() {
        let misplaced = match *level {
            "+" => false,
            "#" => i != last,
            other => other.contains(['+', '#']),
        };
        if misplaced {
            return Err(TopicError::MisplacedWildcard((*level).to_string()));
        }
    }
    Ok(())
}

/// Verifica se `topic` casa com `filter`.
///
/// Assume filtro e tópico já validados. Tópicos iniciados com `$` não casam
/// com curinga no primeiro nível.
pub fn filter_matches(filter: &str, topic: &str) -> bool {
    let mut f = filter.split('/');
    let mut t = topic.split('/');
    let mut first = true;

    loop {
        match (f.next(), t.next()) {
            (Some("#"), Some(level)) => return !(first && level.starts_with('$')),
            // "a/#" também casa com "a"
            (Some("#"), None) => return true,
            (Some("+"), Some(level)) => {
                if first && level.starts_with('$') {
                    return false;
                }
            }
            (Some(fl), Some(tl)) => {
                if fl != tl {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
        first = false;
    }
}
