// src/services/accrual.rs
//
// O motor de acúmulo de saldo: dado o cronograma de taxas de uma sociedade e
// o histórico de pagamentos de um flat, calcula quantos meses-calendário
// inteiros estão em aberto e o valor acumulado, aplicando a taxa
// historicamente correta a cada mês. Função pura: a data "de hoje" é
// injetada, nunca lida do relógio.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::models::society::{MaintenanceRate, RateHistoryEntry, Society};

// ---
// Cronograma de taxas
// ---

/// A taxa vigente mais o histórico de taxas substituídas de uma sociedade.
/// Os intervalos do histórico são semiabertos: `[effective_from, effective_to)`.
#[derive(Debug, Clone)]
pub struct RateSchedule {
    pub current: MaintenanceRate,
    pub history: Vec<RateHistoryEntry>,
}

impl RateSchedule {
    pub fn new(society: &Society, history: Vec<RateHistoryEntry>) -> Self {
        Self {
            current: society.current_rate(),
            history,
        }
    }

    /// Qual era a taxa mensal em vigor na data `date`?
    ///
    /// Percorre o histórico na ordem armazenada (ascendente por
    /// `effective_from`, a ordem que o escritor append-only produz) e retorna
    /// a primeira entrada cujo intervalo contém a data. Sem correspondência
    /// (inclusive com lacunas ou sobreposições em dados malformados), cai na
    /// taxa vigente. Função total: nunca falha, para qualquer data.
    pub fn rate_effective_at(&self, date: NaiveDate) -> Decimal {
        self.history
            .iter()
            .find(|entry| entry.effective_from <= date && date < entry.effective_to)
            .map(|entry| entry.amount)
            .unwrap_or(self.current.amount)
    }

    /// A próxima data em que a taxa pode mudar, estritamente depois de `date`.
    /// Considera os dois extremos de cada entrada do histórico e o início da
    /// taxa vigente: com lacunas entre entradas, o fim de um intervalo também
    /// é um ponto de troca (queda na taxa vigente).
    fn next_change_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.history
            .iter()
            .flat_map(|entry| [entry.effective_from, entry.effective_to])
            .chain(std::iter::once(self.current.effective_from))
            .filter(|boundary| *boundary > date)
            .min()
    }
}

// ---
// Aritmética de meses
// ---

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(date: NaiveDate) -> NaiveDate {
    // Só satura no limite do calendário do chrono (ano 262143)
    date.checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX)
}

/// Primeiro dia do mês seguinte ao mês de `date`.
pub fn first_of_month_after(date: NaiveDate) -> NaiveDate {
    next_month(first_of_month(date))
}

// ---
// Acúmulo por flat
// ---

/// Saldo devedor de um flat em meses-calendário inteiros.
///
/// O cursor parte do primeiro dia do mês seguinte ao último período pago
/// (ou do mês de criação da sociedade, se o flat nunca pagou) e avança mês a
/// mês até o mês corrente, exclusive: o mês ainda em andamento nunca é
/// devido. Cada trecho entre mudanças de taxa é cobrado pela taxa em vigor
/// no seu primeiro mês. Zero meses devidos resulta em saldo zero, não em
/// erro. O laço é O(meses decorridos).
pub fn accrue_flat_balance(
    schedule: &RateSchedule,
    society_created: NaiveDate,
    last_covered_to: Option<NaiveDate>,
    today: NaiveDate,
) -> Decimal {
    let mut cursor = match last_covered_to {
        Some(covered_to) => first_of_month_after(covered_to),
        None => first_of_month(society_created),
    };
    let boundary = first_of_month(today);

    let mut balance = Decimal::ZERO;

    while cursor < boundary {
        let rate = schedule.rate_effective_at(cursor);

        // Próximo corte: a mudança de taxa seguinte, normalizada ao dia 1.
        // Uma mudança no meio do mês do cursor só surte efeito no mês seguinte,
        // o que também garante que o cursor sempre avance.
        let mut cutoff = boundary;
        if let Some(change) = schedule.next_change_after(cursor) {
            let normalized = first_of_month(change);
            let normalized = if normalized > cursor {
                normalized
            } else {
                next_month(normalized)
            };
            if normalized < cutoff {
                cutoff = normalized;
            }
        }

        while cursor < cutoff {
            balance += rate;
            cursor = next_month(cursor);
        }
    }

    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(current_amount: Decimal, current_from: NaiveDate) -> RateSchedule {
        RateSchedule {
            current: MaintenanceRate {
                amount: current_amount,
                currency: "INR".to_string(),
                effective_from: current_from,
            },
            history: Vec::new(),
        }
    }

    fn history_entry(amount: Decimal, from: NaiveDate, to: NaiveDate) -> RateHistoryEntry {
        RateHistoryEntry {
            id: Uuid::new_v4(),
            society_id: Uuid::new_v4(),
            amount,
            currency: "INR".to_string(),
            effective_from: from,
            effective_to: to,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn first_of_month_normaliza_o_dia() {
        assert_eq!(first_of_month(date(2024, 3, 31)), date(2024, 3, 1));
        assert_eq!(first_of_month(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn first_of_month_after_cruza_a_virada_do_ano() {
        assert_eq!(first_of_month_after(date(2024, 12, 15)), date(2025, 1, 1));
        assert_eq!(first_of_month_after(date(2024, 3, 31)), date(2024, 4, 1));
    }

    #[test]
    fn sem_pagamentos_e_sociedade_criada_no_mes_corrente_deve_zero() {
        // P1: nenhum mês inteiro em aberto
        let sched = schedule(dec!(1000), date(2024, 7, 5));
        let due = accrue_flat_balance(&sched, date(2024, 7, 5), None, date(2024, 7, 20));
        assert_eq!(due, Decimal::ZERO);
    }

    #[test]
    fn acumulo_linear_com_taxa_constante() {
        // P2: 3 meses inteiros × R
        let sched = schedule(dec!(1000), date(2024, 1, 1));
        let due = accrue_flat_balance(&sched, date(2024, 4, 1), None, date(2024, 7, 10));
        assert_eq!(due, dec!(3000));
    }

    #[test]
    fn mudanca_de_taxa_divide_o_acumulo() {
        // P3: 2 meses a R1, depois 2 meses a R2
        let mut sched = schedule(dec!(1200), date(2024, 5, 1));
        sched
            .history
            .push(history_entry(dec!(1000), date(2024, 3, 1), date(2024, 5, 1)));

        let due = accrue_flat_balance(&sched, date(2024, 3, 1), None, date(2024, 7, 2));
        assert_eq!(due, dec!(1000) * dec!(2) + dec!(1200) * dec!(2));
    }

    #[test]
    fn pagamento_reposiciona_o_cursor() {
        // P4: só contam os meses depois do período já coberto
        let sched = schedule(dec!(500), date(2024, 1, 1));
        let due = accrue_flat_balance(
            &sched,
            date(2024, 1, 1),
            Some(date(2024, 5, 31)),
            date(2024, 8, 15),
        );
        // Junho e julho em aberto; agosto (mês corrente) excluído
        assert_eq!(due, dec!(1000));
    }

    #[test]
    fn pagamento_cobrindo_ate_o_mes_passado_deve_zero() {
        let sched = schedule(dec!(500), date(2024, 1, 1));
        let due = accrue_flat_balance(
            &sched,
            date(2024, 1, 1),
            Some(date(2024, 7, 31)),
            date(2024, 8, 15),
        );
        assert_eq!(due, Decimal::ZERO);
    }

    #[test]
    fn cenario_de_referencia_2024() {
        // Sociedade criada em 2024-01-01, taxa 1000 até 2024-06-01 e 1200 em
        // diante; um pagamento cobrindo até 2024-03-31; hoje é 2024-07-15.
        // Abril e maio a 1000, junho a 1200; julho (corrente) excluído.
        let mut sched = schedule(dec!(1200), date(2024, 6, 1));
        sched
            .history
            .push(history_entry(dec!(1000), date(2024, 1, 1), date(2024, 6, 1)));

        let due = accrue_flat_balance(
            &sched,
            date(2024, 1, 1),
            Some(date(2024, 3, 31)),
            date(2024, 7, 15),
        );
        assert_eq!(due, dec!(3200));
    }

    #[test]
    fn fronteira_semiaberta_nao_conta_duas_vezes() {
        // O dia exato da troca pertence só à taxa nova
        let mut sched = schedule(dec!(1200), date(2024, 6, 1));
        sched
            .history
            .push(history_entry(dec!(1000), date(2024, 1, 1), date(2024, 6, 1)));

        assert_eq!(sched.rate_effective_at(date(2024, 5, 31)), dec!(1000));
        assert_eq!(sched.rate_effective_at(date(2024, 6, 1)), dec!(1200));
    }

    #[test]
    fn lacuna_no_historico_cai_na_taxa_vigente() {
        // Dados malformados (buraco entre entradas) não quebram o motor
        let mut sched = schedule(dec!(1200), date(2024, 6, 1));
        sched
            .history
            .push(history_entry(dec!(1000), date(2024, 1, 1), date(2024, 3, 1)));
        // Lacuna: 2024-03-01 a 2024-06-01 sem entrada

        assert_eq!(sched.rate_effective_at(date(2024, 4, 1)), dec!(1200));

        let due = accrue_flat_balance(&sched, date(2024, 1, 1), None, date(2024, 7, 1));
        // Jan e fev a 1000; mar, abr e mai na vigente 1200; jun a 1200
        assert_eq!(due, dec!(2000) + dec!(4800));
    }

    #[test]
    fn historico_sobreposto_primeira_correspondencia_vence() {
        let mut sched = schedule(dec!(1500), date(2024, 6, 1));
        sched
            .history
            .push(history_entry(dec!(1000), date(2024, 1, 1), date(2024, 6, 1)));
        sched
            .history
            .push(history_entry(dec!(2000), date(2024, 4, 1), date(2024, 6, 1)));

        // Abril casa com as duas entradas; a primeira na ordem armazenada vence
        assert_eq!(sched.rate_effective_at(date(2024, 4, 1)), dec!(1000));
    }

    #[test]
    fn mudanca_no_meio_do_mes_vale_a_partir_do_mes_seguinte() {
        // Troca em 2024-04-15: abril inteiro fica na taxa antiga
        let mut sched = schedule(dec!(1200), date(2024, 4, 15));
        sched
            .history
            .push(history_entry(dec!(1000), date(2024, 1, 1), date(2024, 4, 15)));

        let due = accrue_flat_balance(&sched, date(2024, 3, 1), None, date(2024, 6, 1));
        // Março e abril a 1000, maio a 1200
        assert_eq!(due, dec!(3200));
    }

    #[test]
    fn anos_sem_pagamento_acumulam_mes_a_mes() {
        // 10 anos em aberto: 120 iterações, nunca O(dias)
        let sched = schedule(dec!(100), date(2014, 1, 1));
        let due = accrue_flat_balance(&sched, date(2014, 6, 1), None, date(2024, 6, 1));
        assert_eq!(due, dec!(100) * dec!(120));
    }
}
