//! Cálculo de peso ideal e classificação do peso atual
//!
//! Fórmula de Devine, dependente do sexo:
//!
//! - masculino: `50 + 0.9 × (altura_cm − 152)`
//! - feminino: `45.5 + 0.9 × (altura_cm − 152)`
//!
//! Alturas abaixo de 152 cm seguem a mesma reta, sem piso.
//!
//! A classificação usa a faixa fechada de ±10% em torno do peso ideal.

use crate::error::CalculationError;
use crate::models::{Pessoa, PesoIdeal, PesoIdealRequest, Sexo, StatusPeso};

const BASE_MASCULINO: f64 = 50.0;
const BASE_FEMININO: f64 = 45.5;
const ALTURA_REFERENCIA_CM: f64 = 152.0;
const KG_POR_CM: f64 = 0.9;

/// Limites da faixa adequada, relativos ao peso ideal
const FAIXA_INFERIOR: f64 = 0.9;
const FAIXA_SUPERIOR: f64 = 1.1;

pub const MENSAGEM_CALCULADO: &str = "Peso ideal calculado com sucesso";

/// Calcula o peso ideal (kg, duas casas decimais) para a altura em metros
pub fn compute_ideal_weight(sexo: Sexo, altura_m: f64) -> Result<f64, CalculationError> {
    if !altura_m.is_finite() || altura_m <= 0.0 {
        return Err(CalculationError::InvalidInput(format!(
            "altura deve ser positiva, recebeu {}",
            altura_m
        )));
    }

    let base = match sexo {
        Sexo::Masculino => BASE_MASCULINO,
        Sexo::Feminino => BASE_FEMININO,
    };
    let altura_cm = altura_m * 100.0;

    Ok(arredondar(base + KG_POR_CM * (altura_cm - ALTURA_REFERENCIA_CM)))
}

/// Mesmo cálculo, com o sexo ainda em texto
pub fn compute_ideal_weight_str(sexo: &str, altura_m: f64) -> Result<f64, CalculationError> {
    let sexo = sexo
        .parse::<Sexo>()
        .map_err(CalculationError::InvalidInput)?;
    compute_ideal_weight(sexo, altura_m)
}

/// Classifica o peso atual contra o peso ideal
///
/// `adequado` dentro de `[ideal × 0.9, ideal × 1.1]`, `acima` além do limite
/// superior e `abaixo` aquém do inferior. Comparações estritas, sem tolerância.
/// Um peso ideal negativo (pessoas muito baixas) segue as mesmas comparações.
pub fn classify(peso_atual: f64, peso_ideal: f64) -> Result<PesoIdeal, CalculationError> {
    if !peso_atual.is_finite() || peso_atual <= 0.0 {
        return Err(CalculationError::InvalidInput(format!(
            "peso deve ser positivo, recebeu {}",
            peso_atual
        )));
    }

    let status_peso = if peso_atual > peso_ideal * FAIXA_SUPERIOR {
        StatusPeso::Acima
    } else if peso_atual < peso_ideal * FAIXA_INFERIOR {
        StatusPeso::Abaixo
    } else {
        StatusPeso::Adequado
    };

    Ok(PesoIdeal {
        peso_ideal,
        status: status_peso.mensagem().to_string(),
        status_peso: Some(status_peso),
    })
}

/// Calcula e classifica o peso de uma pessoa cadastrada
pub fn assess(pessoa: &Pessoa) -> Result<PesoIdeal, CalculationError> {
    let peso_ideal = compute_ideal_weight(pessoa.sexo, pessoa.altura)?;
    classify(pessoa.peso, peso_ideal)
}

/// Devolve a pessoa com os campos derivados preenchidos
pub fn enrich(pessoa: Pessoa) -> Result<Pessoa, CalculationError> {
    let resultado = assess(&pessoa)?;
    Ok(Pessoa {
        peso_ideal: Some(resultado.peso_ideal),
        status: Some(resultado.status),
        status_peso: resultado.status_peso,
        ..pessoa
    })
}

/// Atende um pedido avulso; sem peso atual, não há classificação
pub fn evaluate_request(request: &PesoIdealRequest) -> Result<PesoIdeal, CalculationError> {
    let peso_ideal = compute_ideal_weight_str(&request.sexo, request.altura)?;
    match request.peso {
        Some(peso) => classify(peso, peso_ideal),
        None => Ok(PesoIdeal {
            peso_ideal,
            status: MENSAGEM_CALCULADO.to_string(),
            status_peso: None,
        }),
    }
}

fn arredondar(valor: f64) -> f64 {
    (valor * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pessoa(sexo: Sexo, altura: f64, peso: f64) -> Pessoa {
        Pessoa {
            id: Some(1),
            nome: "João Silva".to_string(),
            cpf: "12345678900".to_string(),
            data_nasc: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            sexo,
            altura,
            peso,
            peso_ideal: None,
            status: None,
            status_peso: None,
        }
    }

    #[test]
    fn test_peso_ideal_na_altura_de_referencia() {
        assert_eq!(compute_ideal_weight(Sexo::Masculino, 1.52).unwrap(), 50.0);
        assert_eq!(compute_ideal_weight(Sexo::Feminino, 1.52).unwrap(), 45.5);
    }

    #[test]
    fn test_peso_ideal_masculino() {
        let ideal = compute_ideal_weight(Sexo::Masculino, 1.75).unwrap();
        assert!((ideal - 70.7).abs() < 1e-9);
    }

    #[test]
    fn test_abaixo_da_referencia_segue_a_reta() {
        let ideal = compute_ideal_weight(Sexo::Masculino, 1.42).unwrap();
        assert!((ideal - 41.0).abs() < 1e-9);
    }

    #[test]
    fn test_altura_invalida() {
        for altura in [0.0, -1.7, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                compute_ideal_weight(Sexo::Feminino, altura),
                Err(CalculationError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_sexo_invalido_nao_tem_padrao() {
        assert!(matches!(
            compute_ideal_weight_str("X", 1.70),
            Err(CalculationError::InvalidInput(_))
        ));
        assert!(compute_ideal_weight_str("F", 1.70).is_ok());
    }

    #[test]
    fn test_classificacao_em_faixa() {
        let ideal = compute_ideal_weight(Sexo::Masculino, 1.75).unwrap();

        let adequado = classify(70.0, ideal).unwrap();
        assert_eq!(adequado.status_peso, Some(StatusPeso::Adequado));
        assert_eq!(adequado.status, "Peso adequado");

        assert_eq!(classify(90.0, ideal).unwrap().status_peso, Some(StatusPeso::Acima));
        assert_eq!(classify(50.0, ideal).unwrap().status_peso, Some(StatusPeso::Abaixo));
    }

    #[test]
    fn test_limites_da_faixa_sao_fechados() {
        assert_eq!(classify(90.0, 100.0).unwrap().status_peso, Some(StatusPeso::Adequado));
        assert_eq!(classify(110.0, 100.0).unwrap().status_peso, Some(StatusPeso::Adequado));
        assert_eq!(classify(110.01, 100.0).unwrap().status_peso, Some(StatusPeso::Acima));
        assert_eq!(classify(89.99, 100.0).unwrap().status_peso, Some(StatusPeso::Abaixo));
    }

    #[test]
    fn test_ideal_negativo_ainda_classifica() {
        let ideal = compute_ideal_weight(Sexo::Masculino, 0.9).unwrap();
        assert!((ideal - -5.8).abs() < 1e-9);

        let resultado = classify(20.0, ideal).unwrap();
        assert_eq!(resultado.status_peso, Some(StatusPeso::Acima));
        assert_eq!(resultado.status, "Acima do peso ideal");

        assert_eq!(classify(60.0, 0.0).unwrap().status_peso, Some(StatusPeso::Acima));
    }

    #[test]
    fn test_peso_atual_invalido() {
        assert!(classify(0.0, 70.7).is_err());
        assert!(classify(f64::NAN, 70.7).is_err());
    }

    #[test]
    fn test_enrich_preenche_derivados() {
        let enriquecida = enrich(pessoa(Sexo::Masculino, 1.75, 100.0)).unwrap();
        assert!((enriquecida.peso_ideal.unwrap() - 70.7).abs() < 1e-9);
        assert_eq!(enriquecida.status.as_deref(), Some("Acima do peso ideal"));
        assert_eq!(enriquecida.status_peso, Some(StatusPeso::Acima));
        assert_eq!(enriquecida.peso, 100.0);
    }

    #[test]
    fn test_recalculo_e_deterministico() {
        let p = pessoa(Sexo::Feminino, 1.65, 55.0);
        assert_eq!(assess(&p).unwrap(), assess(&p).unwrap());
    }

    #[test]
    fn test_pedido_sem_peso() {
        let request = PesoIdealRequest {
            sexo: "F".to_string(),
            altura: 1.52,
            peso: None,
        };
        let resultado = evaluate_request(&request).unwrap();
        assert_eq!(resultado.peso_ideal, 45.5);
        assert_eq!(resultado.status, MENSAGEM_CALCULADO);
        assert_eq!(resultado.status_peso, None);
    }

    #[test]
    fn test_pedido_com_peso() {
        let request = PesoIdealRequest {
            sexo: "F".to_string(),
            altura: 1.52,
            peso: Some(40.0),
        };
        let resultado = evaluate_request(&request).unwrap();
        assert_eq!(resultado.status_peso, Some(StatusPeso::Abaixo));
    }
}
