// VibraWatch — Credential Portal Server
//
// Registers the portal's routing table on the embedded HTTP server and
// carries out the returned actions. Handlers run on the httpd task; the
// only state they share with the main loop is the credential store behind
// a mutex and the restart flag the loop polls each cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use embedded_svc::http::Method;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::server::{Configuration as ServerConfiguration, EspHttpServer};

use crate::portal::{self, Committed, Portal, Reply};
use crate::storage::NvsCredentialStore;

// A credential form is a few hundred bytes; anything bigger is not ours.
const MAX_BODY_BYTES: usize = 1024;

/// Keeps the underlying server alive; dropping this stops the portal.
pub struct PortalServer {
    _server: EspHttpServer<'static>,
}

pub fn serve(
    portal: Portal,
    store: Arc<Mutex<NvsCredentialStore>>,
    restart_pending: Arc<AtomicBool>,
) -> anyhow::Result<PortalServer> {
    let mut server = EspHttpServer::new(&ServerConfiguration::default())?;

    for &(method, path, _) in portal::ROUTES {
        let portal = portal.clone();
        let store = Arc::clone(&store);
        let restart_pending = Arc::clone(&restart_pending);
        let http_method = match method {
            portal::Method::Get => Method::Get,
            portal::Method::Post => Method::Post,
        };

        server.fn_handler(path, http_method, move |mut request| -> anyhow::Result<()> {
            let mut body = Vec::new();
            let mut chunk = [0u8; 128];
            while body.len() < MAX_BODY_BYTES {
                let n = request.read(&mut chunk)?;
                if n == 0 {
                    break;
                }
                body.extend_from_slice(&chunk[..n]);
            }
            let body = String::from_utf8_lossy(&body);

            let outcome = portal.handle(method, path, &body);
            let committed = match store.lock() {
                Ok(mut guard) => outcome.commit(&mut *guard),
                Err(_) => {
                    log::error!("credential store lock poisoned");
                    Committed {
                        reply: Reply::store_failure(),
                        restart: false,
                    }
                }
            };

            let mut response = request.into_response(
                committed.reply.status,
                None,
                &[("Content-Type", committed.reply.content_type)],
            )?;
            response.write_all(committed.reply.body.as_bytes())?;

            // Flag only after the reply is on its way; the main loop adds
            // the grace delay before actually restarting.
            if committed.restart {
                restart_pending.store(true, Ordering::SeqCst);
            }
            Ok(())
        })?;
    }

    Ok(PortalServer { _server: server })
}
