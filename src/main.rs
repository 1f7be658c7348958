#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

use alloc::boxed::Box;
use biped_robot::config::COMMAND_QUEUE_SIZE;
use biped_robot::hw::{servo_clock, setup_leg};
use biped_robot::robot::leg::Side;
use biped_robot::robot::rig::BipedRig;
use biped_robot::tasks::dispatch_task::dispatch_task;
use biped_robot::tasks::net_task::{configurate_and_start_wifi, net_task, runner_task};
use biped_robot::transport::CommandLine;
use core::future::pending;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::Pin;
use esp_hal::mcpwm::McPwm;
use esp_hal::timer::timg::TimerGroup;
use log::info;

esp_bootloader_esp_idf::esp_app_desc!();

//SERVO GPIO: [front, rear]
//LEFT (MCPWM0): [32, 33]
//RIGHT (MCPWM1): [27, 26]

macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init_with(|| $val)
    }};
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let p = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);
    esp_alloc::heap_allocator!(#[unsafe(link_section = ".dram2_uninit")] size: 96 * 1024);

    let timer0 = TimerGroup::new(p.TIMG1);
    esp_hal_embassy::init(timer0.timer0);

    // Servos first, so the legs are centred before the network comes up.
    // Both McPwm units live as long as main, which never returns.
    let clock_cfg = servo_clock().expect("Fail configurating servo clock");
    let mut mcpwm_left = McPwm::new(p.MCPWM0, clock_cfg);
    let mut mcpwm_right = McPwm::new(p.MCPWM1, clock_cfg);

    let left = setup_leg(
        Side::Left,
        clock_cfg,
        mcpwm_left.operator0,
        &mut mcpwm_left.timer0,
        p.GPIO32.degrade(),
        p.GPIO33.degrade(),
    )
    .expect("Fail setting up left leg");
    let right = setup_leg(
        Side::Right,
        clock_cfg,
        mcpwm_right.operator0,
        &mut mcpwm_right.timer0,
        p.GPIO27.degrade(),
        p.GPIO26.degrade(),
    )
    .expect("Fail setting up right leg");
    let rig = BipedRig::new(left, right).expect("Fail assembling the rig");

    let commands = mk_static!(
        Channel<CriticalSectionRawMutex, CommandLine, COMMAND_QUEUE_SIZE>,
        Channel::new()
    );

    // take important peripherals
    let mut rng = esp_hal::rng::Rng::new(p.RNG);
    let timer1 = TimerGroup::new(p.TIMG0);
    let wifi_init = esp_wifi::init(timer1.timer0, rng, p.RADIO_CLK)
        .expect("Failed to initialize WIFI controller");
    let wifi_init = Box::leak(Box::new(wifi_init));
    let (mut wifi_controller, interfaces) =
        esp_wifi::wifi::new(wifi_init, p.WIFI).expect("Failed to initialize WIFI controller");

    configurate_and_start_wifi(&mut wifi_controller)
        .await
        .expect("Fail connecting to wifi");

    //Get the embassy net stack up and working.
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let config = NetConfig::dhcpv4(Default::default());
    let device = interfaces.sta;
    let (stack, runner) = embassy_net::new(
        device,
        config,
        mk_static!(StackResources<3>, StackResources::new()),
        seed,
    );

    info!("Starting biped robot...");
    spawner
        .spawn(dispatch_task(rig, commands.receiver()))
        .expect("Fail spawning dispatch task");
    spawner
        .spawn(runner_task(runner))
        .expect("Fail spawning runner task");
    spawner
        .spawn(net_task(stack, commands.sender()))
        .expect("Fail spawning net task");

    loop {
        pending::<()>().await;
    }
}
