// src/models/messages.rs

//! Operator-facing message strings.
//!
//! The monitored bulletin and its audience are Indonesian, so the display
//! strings are kept in Indonesian. Centralized here so the UI surfaces and
//! the announcer read from one place.

/// Initial placeholder before the first successful cycle.
pub const CONNECTING: &str = "Menghubungkan ke Server BMKG...";

/// Summary used when the bulletin page carries no warning content.
pub const NO_WARNING: &str =
    "Tidak ada Peringatan Dini Cuaca Signifikan di halaman BMKG saat ini.";

/// Summary used when the bulletin text says the warning has ended.
pub const ENDED: &str = "Peringatan Dini Cuaca telah BERAKHIR.";

/// Replaces the connecting placeholder once every endpoint has failed,
/// so the operator sees progress instead of a frozen placeholder.
pub const DEGRADED: &str =
    "Koneksi ke server BMKG terganggu. Sistem sedang mencoba jalur alternatif secara otomatis...";

/// Announcer text for a newly detected warning.
pub const ANNOUNCE_ONSET: &str = "Peringatan Dini Cuaca Terdeteksi.";

/// Announcer text for a lifted warning.
pub const ANNOUNCE_CLEARED: &str = "Peringatan dini cuaca telah berakhir. Kondisi aman.";

/// Status line: all endpoints exhausted.
pub const STATUS_FAILED: &str = "Gagal Koneksi Server";
