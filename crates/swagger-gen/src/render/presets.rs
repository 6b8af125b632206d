//! Built-in templates. Both render with `trim_blocks` and `lstrip_blocks` on.

/// One model: its imports, then a class, interface, type alias or enum.
pub const DEFAULT_MODEL_TEMPLATE: &str = r"{% for dep in data.dependencys %}
import { {{ dep.modules }} } from './{{ dep.id }}';
{% endfor %}

{% if data.description %}
/** {{ data.description }} */
{% endif %}
{% if data.definition == 'enum' %}
export enum {{ data.name }} {
{% for p in data.properties %}
  {{ p.name | enum_key }} = {{ p.value }},
{% endfor %}
}
{% elif data.definition == 'type' %}
export type {{ data.name }} = {{ properties(data.properties, false) }};
{% else %}
export {{ data.definition }} {{ data.name }}{% if data.extends %} extends {{ data.extends }}{% endif %} {
{% for p in data.properties %}
{% if p.description %}
  /** {{ p.description }} */
{% endif %}
  {{ p.name | enum_key }}{% if not p.required %}?{% endif %}: {{ p.type | type_union }}{% if data.definition == 'class' %} = {{ p.value }}{% endif %};
{% endfor %}
}
{% endif %}
";

/// An axios client: one static method per action, grouped into classes and
/// namespaces; top-level actions become plain functions.
pub const DEFAULT_API_TEMPLATE: &str = r"import axios from 'axios';
import type { AxiosRequestConfig, AxiosResponse } from 'axios';
{% if data.dependencys %}
import type {
{% for dep in data.dependencys %}
  {{ dep.modules }},
{% endfor %}
} from '../models';
{% endif %}

export class apiOptions {
  static async request<TData, TResult>(options: AxiosRequestConfig<TData>): Promise<TResult> {
    return axios.request<TData, AxiosResponse<TResult>>(options).then((res) => res.data);
  }
}
{% macro action(a, prefix) %}
  /**
   * {{ a.method }} {{ a.url }}
{% if a.description %}
   * {{ a.description }}
{% endif %}
   */
  {{ prefix }} {{ a.name }}({% if a.parameters %}params: {{ properties(a.parameters, false) }}, {% endif %}{% if a.requestBody %}body: {{ a.requestBody }}, {% endif %}options?: AxiosRequestConfig): Promise<{{ a.returnType }}> {
    return apiOptions.request({
      method: '{{ a.method }}',
      url: `{{ a.url | replace('{', '${params.') }}`,
{% if a.parameters %}
      params,
{% endif %}
{% if a.requestBody %}
      data: body,
{% endif %}
      responseType: '{{ a.responseType }}',
      ...options,
    });
  }
{% endmacro %}
{% for ns in data.namespaces %}

{% if ns.description %}
/** {{ ns.description }} */
{% endif %}
export namespace {{ ns.name }} {
{% for c in ns.controllers %}
{% if c.description %}
  /** {{ c.description }} */
{% endif %}
  export class {{ c.name }} {
{% for a in c.actions %}
{{ action(a, 'static async') }}
{% endfor %}
  }
{% endfor %}
}
{% endfor %}
{% for c in data.controllers %}

{% if c.description %}
/** {{ c.description }} */
{% endif %}
export class {{ c.name }} {
{% for a in c.actions %}
{{ action(a, 'static async') }}
{% endfor %}
}
{% endfor %}
{% for a in data.actions %}

{{ action(a, 'export async function') }}
{% endfor %}
";
