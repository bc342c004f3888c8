use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::AppError;

/// 连接到已打开调试端口的浏览器，并找到测验页面
///
/// 查找顺序：标题包含 `target_title` → URL 以 `target_url` 开头 →
/// 新开 `target_url` → 第一个已打开的页面
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}, 目标标题: {:?}", target_url, target_title);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await.context("无法获取页面列表")?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(title) = target_title {
        for p in pages.iter() {
            if let Ok(Some(page_title)) = p.get_title().await {
                if page_title.contains(title) {
                    info!("✓ 找到测验页面: {}", page_title);
                    return Ok((browser, p.clone()));
                }
            }
        }
        debug!("没有标题包含 '{}' 的页面", title);
    }

    if let Some(url) = target_url {
        for p in pages.iter() {
            if let Ok(Some(page_url)) = p.url().await {
                if page_url.starts_with(url) {
                    info!("✓ 找到测验页面: {}", page_url);
                    return Ok((browser, p.clone()));
                }
            }
        }

        debug!("创建新页面并导航到: {}", url);
        let page = browser
            .new_page(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        info!("已导航到: {}", url);
        return Ok((browser, page));
    }

    let page = pages
        .into_iter()
        .next()
        .context("浏览器中没有打开的页面，请设置 PSE_TARGET_URL")?;
    info!("使用第一个已打开的页面");

    Ok((browser, page))
}
