// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers shared across module tests.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
	/// Route this thread's events into the buffer until the guard drops.
	pub(crate) fn install(&self) -> DefaultGuard {
		let subscriber = tracing_subscriber::fmt()
			.with_writer(self.clone())
			.with_ansi(false)
			.finish();
		tracing::subscriber::set_default(subscriber)
	}

	pub(crate) fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock()).into_owned()
	}
}

impl io::Write for CapturedLogs {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl<'a> MakeWriter<'a> for CapturedLogs {
	type Writer = CapturedLogs;

	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}
