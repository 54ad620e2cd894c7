//! Payload types returned by the backend.
//!
//! Every field is a string on the wire; missing fields read as empty.

use serde::{Deserialize, Serialize};

/// Event details shown to an evaluator (`getInformacoes`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInfo {
    pub id: String,
    pub nome_do_avaliador: String,
    pub categoria: String,
    pub cliente: String,
    pub endereco_cliente: String,
    pub informacoes_adicionais: String,
    pub turmas: String,
    /// Rules and challenge text, delivered as ready-to-render HTML.
    pub tema_pergunta_regras: String,
    pub data_limite_avaliacao: String,
    pub data_pitch: String,
    pub horario_inicio: String,
    pub horario_fim: String,
}

/// One scoring criterion with the description of each score level (`getRubricas`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rubric {
    pub avaliacao: String,
    pub criterio: String,
    pub cinco_pontos: String,
    pub quatro_pontos: String,
    pub tres_pontos: String,
    pub dois_pontos: String,
    pub um_ponto: String,
}

impl Rubric {
    /// Level descriptions from 5 points down to 1.
    pub fn levels(&self) -> [(u8, &str); 5] {
        [
            (5, self.cinco_pontos.as_str()),
            (4, self.quatro_pontos.as_str()),
            (3, self.tres_pontos.as_str()),
            (2, self.dois_pontos.as_str()),
            (1, self.um_ponto.as_str()),
        ]
    }
}
