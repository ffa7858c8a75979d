//! Ledger persistence
//!
//! Classified events are appended to one sheet per event kind. The default
//! store keeps each sheet as a CSV file in a directory; other stores only
//! need to implement [`LedgerStore`].
//!
//! # Sheets
//!
//! | Kind | Sheet |
//! |------|-------|
//! | `receita` | Receitas |
//! | `despesa_servico` | Despesas Serviço |
//! | `despesa_pessoal` | Despesas Pessoal |
//! | `despesa`, `nao_classificado` | Não Classificado |

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{EventKind, FinancialEvent, RawMessage};

/// Column header shared by every sheet
pub const HEADER: [&str; 9] = [
    "Data/Hora",
    "Dia Semana",
    "Tipo",
    "Tags",
    "Valor (R$)",
    "Cliente",
    "Descrição",
    "Aviso",
    "Origem",
];

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Destination sheet of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerSheet {
    Receitas,
    DespesasServico,
    DespesasPessoal,
    /// Needs manual review
    NaoClassificado,
}

impl LedgerSheet {
    pub fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::Receita => Self::Receitas,
            EventKind::DespesaServico => Self::DespesasServico,
            EventKind::DespesaPessoal => Self::DespesasPessoal,
            EventKind::Despesa | EventKind::NaoClassificado => Self::NaoClassificado,
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Receitas => "Receitas",
            Self::DespesasServico => "Despesas Serviço",
            Self::DespesasPessoal => "Despesas Pessoal",
            Self::NaoClassificado => "Não Classificado",
        }
    }

    /// File name used by [`CsvLedger`]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Receitas => "receitas.csv",
            Self::DespesasServico => "despesas_servico.csv",
            Self::DespesasPessoal => "despesas_pessoal.csv",
            Self::NaoClassificado => "nao_classificado.csv",
        }
    }

    pub fn all() -> &'static [LedgerSheet] {
        &[
            Self::Receitas,
            Self::DespesasServico,
            Self::DespesasPessoal,
            Self::NaoClassificado,
        ]
    }
}

impl std::fmt::Display for LedgerSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// One ledger line, in [`HEADER`] order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub timestamp: String,
    pub weekdays: String,
    pub kind: String,
    pub tags: String,
    pub amount: String,
    pub counterparty: String,
    pub description: String,
    pub advisory: String,
    pub origin: String,
}

impl LedgerRow {
    /// Build the row for `event`. An empty description falls back to the
    /// full message text.
    pub fn from_event(event: &FinancialEvent, message: &str, at: DateTime<Local>) -> Self {
        let description = if event.description.trim().is_empty() {
            message.trim().to_string()
        } else {
            event.description.clone()
        };

        Self {
            timestamp: at.format(DATE_FORMAT).to_string(),
            weekdays: event.weekdays.join(", "),
            kind: event.kind.as_str().to_string(),
            tags: event.tags.join(", "),
            amount: event
                .amount
                .as_deref()
                .map(normalize_amount)
                .unwrap_or_default(),
            counterparty: event.counterparty.clone().unwrap_or_default(),
            description,
            advisory: event.advisory.clone().unwrap_or_default(),
            origin: event.origin.as_str().to_string(),
        }
    }
}

/// Normalize a Brazilian or plain numeric literal to two decimals.
///
/// The right-most separator is the decimal mark when both `.` and `,` occur.
/// A lone separator followed only by three-digit groups is a thousands
/// separator; otherwise it is the decimal mark. Unparseable input is
/// returned unchanged.
pub fn normalize_amount(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }

    let canonical = match (value.rfind('.'), value.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => value.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => value.replace(',', ""),
        (Some(_), None) => single_separator(value, '.'),
        (None, Some(_)) => single_separator(value, ','),
        (None, None) => value.to_string(),
    };

    match canonical.parse::<f64>() {
        Ok(n) if n.is_finite() => format!("{:.2}", n),
        _ => raw.to_string(),
    }
}

fn single_separator(value: &str, sep: char) -> String {
    let groups: Vec<&str> = value.split(sep).collect();
    let thousands = groups.len() > 1
        && !groups[0].is_empty()
        && groups[1..].iter().all(|g| g.len() == 3);

    if thousands {
        groups.concat()
    } else if groups.len() == 2 {
        value.replace(sep, ".")
    } else {
        value.to_string()
    }
}

/// Storage backend for ledger sheets
pub trait LedgerStore: Send + Sync {
    /// Store name (for logging)
    fn name(&self) -> &str;

    /// Create every sheet with its header if it does not exist yet
    fn initialize(&self) -> Result<()>;

    /// Append one row to a sheet
    fn append(&self, sheet: LedgerSheet, row: &LedgerRow) -> Result<()>;
}

/// Ledger kept as one CSV file per sheet
pub struct CsvLedger {
    dir: PathBuf,
}

impl CsvLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, sheet: LedgerSheet) -> PathBuf {
        self.dir.join(sheet.file_name())
    }

    /// Read every row of a sheet; a missing sheet has no rows
    pub fn rows(&self, sheet: LedgerSheet) -> Result<Vec<LedgerRow>> {
        let path = self.path(sheet);
        if !path.exists() {
            return Ok(Vec::new());
        }

        // columns are positional; the header carries display names
        let mut reader = csv::Reader::from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.deserialize(None)?);
        }
        Ok(rows)
    }

    fn ensure_sheet(&self, sheet: LedgerSheet) -> Result<PathBuf> {
        let path = self.path(sheet);
        if path.exists() {
            return Ok(path);
        }

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                Error::Ledger(format!(
                    "Failed to create ledger directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
            info!("Created ledger directory: {}", self.dir.display());
        }

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        info!("Created sheet '{}': {}", sheet, path.display());

        Ok(path)
    }
}

impl LedgerStore for CsvLedger {
    fn name(&self) -> &str {
        "csv"
    }

    fn initialize(&self) -> Result<()> {
        for sheet in LedgerSheet::all() {
            self.ensure_sheet(*sheet)?;
        }
        Ok(())
    }

    fn append(&self, sheet: LedgerSheet, row: &LedgerRow) -> Result<()> {
        let path = self.ensure_sheet(sheet)?;
        let file = OpenOptions::new().append(true).open(&path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;

        debug!("Appended row to '{}'", sheet);
        Ok(())
    }
}

/// Outcome of recording a batch of events
#[derive(Debug, Clone, Default)]
pub struct RecordSummary {
    /// Sheet of every event written, in event order
    pub saved: Vec<LedgerSheet>,
    /// One message per event that could not be written
    pub errors: Vec<String>,
}

impl RecordSummary {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Append every event of `message` to its sheet. A failed write is recorded
/// in the summary and does not stop the remaining events.
pub fn record_events(
    store: &dyn LedgerStore,
    events: &[FinancialEvent],
    message: &RawMessage,
) -> RecordSummary {
    let mut summary = RecordSummary::default();

    for event in events {
        let sheet = LedgerSheet::for_kind(event.kind);
        let row = LedgerRow::from_event(event, &message.text, message.received_at);

        match store.append(sheet, &row) {
            Ok(()) => summary.saved.push(sheet),
            Err(e) => {
                warn!("Failed to record {} event in '{}': {}", event.kind, sheet, e);
                summary.errors.push(format!("{}: {}", sheet, e));
            }
        }
    }

    info!(
        "Recorded {} of {} events via {}",
        summary.saved.len(),
        events.len(),
        store.name()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    use crate::models::Origin;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 14, 9, 5, 0).unwrap()
    }

    #[test]
    fn test_sheet_for_kind() {
        assert_eq!(LedgerSheet::for_kind(EventKind::Receita), LedgerSheet::Receitas);
        assert_eq!(
            LedgerSheet::for_kind(EventKind::DespesaServico),
            LedgerSheet::DespesasServico
        );
        assert_eq!(
            LedgerSheet::for_kind(EventKind::DespesaPessoal),
            LedgerSheet::DespesasPessoal
        );
        assert_eq!(
            LedgerSheet::for_kind(EventKind::Despesa),
            LedgerSheet::NaoClassificado
        );
        assert_eq!(
            LedgerSheet::for_kind(EventKind::NaoClassificado),
            LedgerSheet::NaoClassificado
        );
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("2.500"), "2500.00");
        assert_eq!(normalize_amount("1.200,50"), "1200.50");
        assert_eq!(normalize_amount("1200.50"), "1200.50");
        assert_eq!(normalize_amount("2500,50"), "2500.50");
        assert_eq!(normalize_amount("1.234.567"), "1234567.00");
        assert_eq!(normalize_amount("1,200.50"), "1200.50");
        assert_eq!(normalize_amount("17"), "17.00");
        assert_eq!(normalize_amount("1.5"), "1.50");
        assert_eq!(normalize_amount(""), "");
        assert_eq!(normalize_amount("uns"), "uns");
    }

    #[test]
    fn test_row_from_event() {
        let mut event = FinancialEvent::new(EventKind::DespesaServico, "Paguei diária do pedreiro")
            .with_amount("1.200,50")
            .with_tags(["funcionario"]);
        event.weekdays = vec!["segunda".into(), "terça".into()];
        event.origin = Origin::ExternalService;

        let row = LedgerRow::from_event(&event, "mensagem", at());
        assert_eq!(row.timestamp, "14/03/2024 09:05");
        assert_eq!(row.weekdays, "segunda, terça");
        assert_eq!(row.kind, "despesa_servico");
        assert_eq!(row.tags, "funcionario");
        assert_eq!(row.amount, "1200.50");
        assert_eq!(row.counterparty, "");
        assert_eq!(row.description, "Paguei diária do pedreiro");
        assert_eq!(row.origin, "external_service");
    }

    #[test]
    fn test_row_falls_back_to_message() {
        let event = FinancialEvent::new(EventKind::Despesa, "  ");
        let row = LedgerRow::from_event(&event, " Paguei 500 hoje. ", at());
        assert_eq!(row.description, "Paguei 500 hoje.");
        assert_eq!(row.amount, "");
    }

    #[test]
    fn test_initialize_creates_headers() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::new(dir.path().join("livro"));
        ledger.initialize().unwrap();

        for sheet in LedgerSheet::all() {
            let content = std::fs::read_to_string(ledger.path(*sheet)).unwrap();
            assert_eq!(content.lines().next().unwrap(), HEADER.join(","));
        }

        // idempotent
        ledger.initialize().unwrap();
        assert!(ledger.rows(LedgerSheet::Receitas).unwrap().is_empty());
    }

    #[test]
    fn test_record_events_routes_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::new(dir.path());
        let message = RawMessage::at("Quinta recebi 2.500 da Ana. Paguei 500 hoje.", at());

        let mut revenue = FinancialEvent::new(EventKind::Receita, "Quinta recebi da Ana")
            .with_amount("2.500");
        revenue.counterparty = Some("Ana".into());
        let generic = FinancialEvent::new(EventKind::Despesa, "Paguei hoje").with_amount("500");

        let summary = record_events(&ledger, &[revenue, generic], &message);
        assert!(summary.is_complete());
        assert_eq!(
            summary.saved,
            vec![LedgerSheet::Receitas, LedgerSheet::NaoClassificado]
        );

        let rows = ledger.rows(LedgerSheet::Receitas).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, "2500.00");
        assert_eq!(rows[0].counterparty, "Ana");

        let rows = ledger.rows(LedgerSheet::NaoClassificado).unwrap();
        assert_eq!(rows[0].amount, "500.00");
        assert!(ledger.rows(LedgerSheet::DespesasPessoal).unwrap().is_empty());
    }

    /// Store that rejects one sheet
    struct FlakyStore {
        rejects: LedgerSheet,
        written: Mutex<Vec<LedgerSheet>>,
    }

    impl LedgerStore for FlakyStore {
        fn name(&self) -> &str {
            "flaky"
        }

        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn append(&self, sheet: LedgerSheet, _row: &LedgerRow) -> Result<()> {
            if sheet == self.rejects {
                return Err(Error::Ledger("quota exceeded".into()));
            }
            self.written.lock().unwrap().push(sheet);
            Ok(())
        }
    }

    #[test]
    fn test_record_events_continues_after_failure() {
        let store = FlakyStore {
            rejects: LedgerSheet::Receitas,
            written: Mutex::new(Vec::new()),
        };
        let events = vec![
            FinancialEvent::new(EventKind::Receita, "recebi"),
            FinancialEvent::new(EventKind::DespesaPessoal, "mercado"),
        ];

        let summary = record_events(&store, &events, &RawMessage::at("x", at()));
        assert_eq!(summary.saved, vec![LedgerSheet::DespesasPessoal]);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("quota exceeded"));
        assert_eq!(*store.written.lock().unwrap(), vec![LedgerSheet::DespesasPessoal]);
    }
}
