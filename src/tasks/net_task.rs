//! Networking and TCP command server task.
//!
//! Brings up the WiFi station, accepts one client at a time on [`PORT`], frames
//! the incoming bytes into lines and queues them for the dispatcher. The queue is
//! never waited on: when it is full the line is dropped.
extern crate alloc;

use alloc::string::String;
use embassy_net::{tcp::TcpSocket, IpListenEndpoint, Stack};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Sender};
use embassy_time::Timer;
use esp_wifi::wifi::{ClientConfiguration, WifiController, WifiDevice, WifiError};
use log::{error, info};

use crate::config::{COMMAND_LINE_CAPACITY, COMMAND_QUEUE_SIZE, PORT, RX_BUF_SIZE, TX_BUF_SIZE};
use crate::transport::{enqueue_line, CommandLine, LineFramer};

pub type CommandSender = Sender<'static, CriticalSectionRawMutex, CommandLine, COMMAND_QUEUE_SIZE>;

#[embassy_executor::task]
pub async fn runner_task(mut runner: embassy_net::Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

#[embassy_executor::task]
pub async fn net_task(stack: Stack<'static>, cmd_sender: CommandSender) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut tx_buf = [0u8; TX_BUF_SIZE];

    while !stack.is_link_up() {
        Timer::after_millis(500).await;
    }
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        info!(
            "[NET_TASK] TCP server listening at address {}:{}",
            config.address, PORT
        );
    }

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);

        match socket
            .accept(IpListenEndpoint {
                port: PORT,
                addr: None,
            })
            .await
        {
            Ok(_) => {
                info!("[NET_TASK] Client connected!");
                handle_connection(&mut socket, &cmd_sender).await;
                socket.close();
                info!("[NET_TASK] Client disconnected");
            }
            Err(e) => {
                error!("[NET_TASK] Accept failed: {:?}", e);
                Timer::after_millis(500).await; // Backoff delay
                continue;
            }
        }
    }
}

/// Reads until the client closes, queueing every complete line.
pub async fn handle_connection(socket: &mut TcpSocket<'_>, cmd_sender: &CommandSender) {
    let mut read_buf = [0u8; RX_BUF_SIZE];
    let mut framer = LineFramer::<COMMAND_LINE_CAPACITY>::new();
    loop {
        match socket.read(&mut read_buf).await {
            Ok(0) => break,
            Ok(n) => framer.push(&read_buf[..n], |line| {
                // a dropped line is already logged
                let _ = enqueue_line(cmd_sender, line);
            }),
            Err(e) => {
                error!("[NET_TASK] Read error: {:?}", e);
                break;
            }
        }
    }
    if framer.pending() > 0 {
        info!("[NET_TASK] discarding {} unterminated bytes", framer.pending());
    }
}

pub async fn configurate_and_start_wifi(
    wifi_controller: &mut WifiController<'_>,
) -> Result<(), WifiError> {
    let ssid = env!("WIFI_SSID");
    let password = env!("WIFI_PASS");
    let config = esp_wifi::wifi::Configuration::Client(ClientConfiguration {
        ssid: String::from(ssid),
        password: String::from(password),
        ..Default::default()
    });

    info!("[NET_TASK] Connecting to wifi: {ssid}");
    wifi_controller.set_configuration(&config)?;
    wifi_controller.set_power_saving(esp_wifi::config::PowerSaveMode::None)?;
    wifi_controller.start()?;
    wifi_controller
        .connect_async()
        .await
        .inspect_err(|e| error!("[NET_TASK] An error occured trying to connect to wifi: {e:?}"))?;

    if let Ok(rssi) = wifi_controller.rssi() {
        info!("[NET_TASK] Wifi connected! signal: {}", rssi)
    }
    Ok(())
}
